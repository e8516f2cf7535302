//! End-to-end planning and installation scenarios through the public API.

use cfgtool::error::{CfgError, Result};
use cfgtool::links::LinkManager;
use cfgtool::repository::{
    GitGateway, RepositoryGateway, RepositoryHandle, RepositoryOrigin, RepositorySpec,
};
use cfgtool::requirements::{
    BinaryLocator, DependencyPlanner, InstallAttempt, InstallRecipe, Installer, ProbeStrategy,
    RequirementRegistry, ToolRequirement, ToolState, Version, VersionProbe,
};
use cfgtool::runner::{
    all_succeeded, BootstrapOptions, Bootstrapper, InstallOutcome, InstallationOrchestrator,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use tempfile::TempDir;

static GIT_LOCK: Mutex<()> = Mutex::new(());

struct Host {
    present: Vec<&'static str>,
    versions: Vec<(&'static str, Version)>,
}

impl BinaryLocator for Host {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.present
            .contains(&program)
            .then(|| PathBuf::from("/usr/local/bin").join(program))
    }
}

impl VersionProbe for Host {
    fn probe(&self, requirement: &ToolRequirement, _resolved: &Path) -> Result<Option<Version>> {
        if requirement.probe == ProbeStrategy::Presence {
            return Ok(None);
        }
        self.versions
            .iter()
            .find(|(name, _)| *name == requirement.identifier)
            .map(|(_, v)| Some(*v))
            .ok_or_else(|| CfgError::VersionParseFailure {
                tool: requirement.identifier.clone(),
                message: "no version token".to_string(),
            })
    }
}

/// Installer double: fails for the named tools, records every call.
struct Recorder {
    failing: Vec<&'static str>,
    calls: RefCell<Vec<String>>,
}

impl Recorder {
    fn failing(failing: Vec<&'static str>) -> Self {
        Self {
            failing,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl Installer for Recorder {
    fn install(&self, requirement: &ToolRequirement) -> Result<InstallAttempt> {
        self.calls.borrow_mut().push(requirement.identifier.clone());
        if self.failing.contains(&requirement.identifier.as_str()) {
            return Err(CfgError::InstallerFailure {
                tool: requirement.identifier.clone(),
                message: "exit status 1".to_string(),
            });
        }
        Ok(InstallAttempt::Installed)
    }
}

fn shell(command: &str) -> Option<InstallRecipe> {
    Some(InstallRecipe::Shell {
        command: command.to_string(),
    })
}

fn editor_toolchain() -> RequirementRegistry {
    let mut vim = ToolRequirement::new("vim")
        .with_minimum(Version::new(8, 1))
        .with_probe(ProbeStrategy::Field {
            index: 4,
            args: vec!["--version".to_string()],
        });
    vim.install = shell("apt-get install -y vim");

    let mut node = ToolRequirement::new("node").with_minimum(Version::new(10, 12));
    node.install = shell("install-node");

    let mut cmake = ToolRequirement::new("cmake").with_minimum(Version::new(3, 8));
    cmake.install = shell("apt-get install -y cmake");

    RequirementRegistry::new([
        vim,
        node,
        cmake,
        ToolRequirement::new("ccls")
            .requires("cmake")
            .with_probe(ProbeStrategy::Presence)
            .with_install(InstallRecipe::Source {
                repository: "ccls".to_string(),
                build: vec!["cmake --build Release".to_string()],
            }),
        ToolRequirement::new("bear")
            .with_probe(ProbeStrategy::Presence)
            .with_install(InstallRecipe::Shell {
                command: "apt-get install -y bear".to_string(),
            }),
    ])
}

#[test]
fn scenario_a_failure_does_not_stop_independent_installs() {
    let registry = editor_toolchain();
    let host = Host {
        present: vec!["node", "cmake", "ccls"],
        versions: vec![("node", Version::new(12, 0)), ("cmake", Version::new(3, 16))],
    };
    let planner = DependencyPlanner::new(&registry, &host, &host).unwrap();

    let statuses = planner.classify();
    let plan = planner.plan(&statuses).unwrap();
    assert_eq!(plan.identifiers(), vec!["vim", "bear"]);
    assert!(plan.entries().iter().all(|e| !e.is_pre_skipped()));

    let installer = Recorder::failing(vec!["vim"]);
    let results = InstallationOrchestrator::new(&registry, &installer).execute(&plan);

    assert_eq!(results[0].outcome, InstallOutcome::Failed);
    assert!(results[0].message.contains("Install vim manually"));
    assert_eq!(results[1].outcome, InstallOutcome::Succeeded);
    assert!(!all_succeeded(&results));
}

#[test]
fn scenario_b_failed_prerequisite_skips_dependent() {
    let registry = editor_toolchain();
    let host = Host {
        present: vec!["vim", "node", "bear"],
        versions: vec![("vim", Version::new(8, 2)), ("node", Version::new(12, 0))],
    };
    let planner = DependencyPlanner::new(&registry, &host, &host).unwrap();
    let plan = planner.plan(&planner.classify()).unwrap();
    assert_eq!(plan.identifiers(), vec!["cmake", "ccls"]);

    let installer = Recorder::failing(vec!["cmake"]);
    let results = InstallationOrchestrator::new(&registry, &installer).execute(&plan);

    assert_eq!(results.len(), 2);
    assert!(results[1].skipped());
    assert!(!results[1].succeeded());
    assert_eq!(*installer.calls.borrow(), vec!["cmake"]);
}

#[test]
fn scenario_c_satisfied_environment_is_a_no_op() {
    let registry = editor_toolchain();
    let host = Host {
        present: vec!["vim", "node", "cmake", "ccls", "bear"],
        versions: vec![
            ("vim", Version::new(8, 2)),
            ("node", Version::new(12, 0)),
            ("cmake", Version::new(3, 16)),
        ],
    };
    let planner = DependencyPlanner::new(&registry, &host, &host).unwrap();

    let statuses = planner.classify();
    assert!(statuses.iter().all(|s| s.state == ToolState::Satisfied));
    let plan = planner.plan(&statuses).unwrap();
    assert!(plan.is_empty());

    let installer = Recorder::failing(vec![]);
    let results = InstallationOrchestrator::new(&registry, &installer).execute(&plan);
    assert!(results.is_empty());
    assert!(all_succeeded(&results));
    assert!(installer.calls.borrow().is_empty());
}

#[test]
fn classification_is_stable_across_runs() {
    let registry = editor_toolchain();
    let host = Host {
        present: vec!["vim", "cmake"],
        versions: vec![("vim", Version::new(7, 4))],
    };
    let planner = DependencyPlanner::new(&registry, &host, &host).unwrap();

    let first = planner.classify();
    assert_eq!(first, planner.classify());
    assert_eq!(first[0].state, ToolState::Outdated);
    assert_eq!(first[2].state, ToolState::ProbeFailed);
}

#[test]
fn double_digit_minor_versions_compare_numerically() {
    assert!(Version::new(8, 10) > Version::new(8, 3));
    assert!("8.10".parse::<Version>().unwrap() > "8.3".parse::<Version>().unwrap());
}

fn git(args: &[&str], cwd: &Path) {
    let output = Command::new("git")
        .args(["-c", "user.name=Test", "-c", "user.email=test@test.com"])
        .args(args)
        .current_dir(cwd)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn bare_config_repo(parent: &Path) -> PathBuf {
    let bare = parent.join("vim_configurations.git");
    let work = parent.join("seed");
    std::fs::create_dir_all(&work).unwrap();
    git(
        &["init", "--bare", "--initial-branch=master", &bare.to_string_lossy()],
        parent,
    );
    git(&["clone", &bare.to_string_lossy(), "."], &work);
    std::fs::write(work.join("vimrc"), "syntax on\n").unwrap();
    git(&["add", "."], &work);
    git(&["commit", "-m", "vimrc"], &work);
    git(&["push", "origin", "HEAD:master"], &work);
    bare
}

/// Gateway that counts clones on top of the real one.
struct CountingGateway {
    inner: GitGateway,
    cloned: RefCell<usize>,
}

impl RepositoryGateway for CountingGateway {
    fn bind_or_clone(&self, spec: &RepositorySpec) -> Result<RepositoryHandle> {
        let handle = self.inner.bind_or_clone(spec)?;
        if handle.origin == RepositoryOrigin::Cloned {
            *self.cloned.borrow_mut() += 1;
        }
        Ok(handle)
    }
}

#[test]
fn repository_is_cloned_once_then_bound_and_linked() {
    let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new().unwrap();
    let bare = bare_config_repo(temp.path());
    let home = temp.path().join("home");
    std::fs::create_dir_all(&home).unwrap();

    let registry = RequirementRegistry::new([]);
    let repositories = vec![RepositorySpec {
        name: "vim_configurations".to_string(),
        remote_url: bare.to_string_lossy().into_owned(),
        branch: "master".to_string(),
        local_root: temp.path().join("deps"),
    }];
    let links = vec![cfgtool::links::LinkSpec {
        repository: "vim_configurations".to_string(),
        source: PathBuf::from("vimrc"),
        target: "~/.vimrc".to_string(),
    }];
    let host = Host {
        present: vec![],
        versions: vec![],
    };
    let gateway = CountingGateway {
        inner: GitGateway::new(),
        cloned: RefCell::new(0),
    };
    let installer = Recorder::failing(vec![]);
    let link_manager = LinkManager::new(&home, false);
    let bootstrapper = Bootstrapper {
        registry: &registry,
        repositories: &repositories,
        links: &links,
        locator: &host,
        probe: &host,
        gateway: &gateway,
        installer: &installer,
        link_manager: &link_manager,
    };

    let first = bootstrapper.run(BootstrapOptions::default()).unwrap();
    assert!(first.success(), "{:?}", first);
    assert_eq!(*gateway.cloned.borrow(), 1);
    assert_eq!(
        std::fs::read_to_string(home.join(".vimrc")).unwrap(),
        "syntax on\n"
    );

    let second = bootstrapper.run(BootstrapOptions::default()).unwrap();
    assert!(second.success());
    assert_eq!(*gateway.cloned.borrow(), 1);
    assert_eq!(
        second.links[0].state,
        cfgtool::links::LinkState::AlreadyLinked
    );
}
