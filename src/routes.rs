/// Views reachable in the browser. Anything else is sent back to the upload page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRoute {
    Upload,
    Admin,
    Dashboard,
}

impl AppRoute {
    pub const ALL: [AppRoute; 3] = [AppRoute::Upload, AppRoute::Admin, AppRoute::Dashboard];

    pub fn path(self) -> &'static str {
        match self {
            AppRoute::Upload => "/",
            AppRoute::Admin => "/admin",
            AppRoute::Dashboard => "/dashboard",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        AppRoute::ALL.into_iter().find(|route| route.path() == trimmed)
    }

    pub fn resolve(path: &str) -> Self {
        AppRoute::from_path(path).unwrap_or(AppRoute::Upload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_resolve() {
        assert_eq!(AppRoute::from_path("/"), Some(AppRoute::Upload));
        assert_eq!(AppRoute::from_path("/admin"), Some(AppRoute::Admin));
        assert_eq!(AppRoute::from_path("/dashboard/"), Some(AppRoute::Dashboard));
    }

    #[test]
    fn unknown_paths_fall_back_to_upload() {
        assert_eq!(AppRoute::from_path("/admin-login"), None);
        assert_eq!(AppRoute::resolve("/admin-login"), AppRoute::Upload);
        assert_eq!(AppRoute::resolve("/dashboard/files"), AppRoute::Upload);
    }
}
