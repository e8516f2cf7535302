//! Git repositories that supply configuration and source trees.

pub mod gateway;

pub use gateway::{
    GitCli, GitClient, GitGateway, RepositoryGateway, RepositoryHandle, RepositoryOrigin,
    RepositorySpec,
};
