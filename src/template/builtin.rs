//! Templates and static scripts shipped inside the binary

use super::Template;

pub const MINION: &str = include_str!("../../templates/minion.tmpl");
pub const MINION_EXTRA_CONFIG: &str = include_str!("../../templates/99-minion.conf.tmpl");
pub const SPM: &str = include_str!("../../templates/spm.tmpl");
pub const DEPENDENCIES: &str = include_str!("../../templates/dependencies.sh.tmpl");
pub const INSTALL_POSIX: &str = include_str!("../../templates/install.sh.tmpl");
pub const INSTALL_WINDOWS: &str = include_str!("../../templates/install.ps1.tmpl");
pub const MOCK_MODULE: &str = include_str!("../../templates/mock/_states/mock.py");

/// Scripts copied verbatim to the sandbox root
pub const STATIC_SCRIPTS: &[(&str, &str)] = &[
    (
        "formula-fetch.sh",
        include_str!("../../templates/formula-fetch.sh"),
    ),
    (
        "repository-setup.sh",
        include_str!("../../templates/repository-setup.sh"),
    ),
];

/// Mock state files, relative to the salt file root
pub const MOCK_STATES: &[(&str, &str)] = &[
    ("mock/mine.sls", include_str!("../../templates/mock/mine.sls")),
    (
        "mock/remote_functions.sls",
        include_str!("../../templates/mock/remote_functions.sls"),
    ),
];

pub fn minion() -> Template {
    Template::new("minion", MINION)
}

pub fn minion_extra_config() -> Template {
    Template::new("99-minion.conf", MINION_EXTRA_CONFIG)
}

pub fn spm() -> Template {
    Template::new("spm", SPM)
}

pub fn dependencies() -> Template {
    Template::new("dependencies.sh", DEPENDENCIES)
}

pub fn install_posix() -> Template {
    Template::new("install.sh", INSTALL_POSIX)
}

pub fn install_windows() -> Template {
    Template::new("install.ps1", INSTALL_WINDOWS)
}

/// State module implementing `mock.mine` and `mock.remote_functions`
pub fn mock_module() -> Template {
    Template::new("_states/mock.py", MOCK_MODULE)
}
