/// Supported VCS types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsType {
    Hg,
    Git,
}

impl VcsType {
    /// Name of the executable looked up on PATH
    pub fn binary_name(&self) -> &'static str {
        match self {
            VcsType::Hg => "hg",
            VcsType::Git => "git",
        }
    }

    /// Metadata entry marking the root of a working copy
    pub fn marker(&self) -> &'static str {
        match self {
            VcsType::Hg => ".hg",
            VcsType::Git => ".git",
        }
    }

    /// Remote name used when none is given explicitly
    pub fn default_remote(&self) -> &'static str {
        match self {
            VcsType::Hg => "default",
            VcsType::Git => "origin",
        }
    }
}

impl std::fmt::Display for VcsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.binary_name())
    }
}
