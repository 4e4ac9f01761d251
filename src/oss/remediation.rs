use super::{OssIssue, UpgradeStep};

const NPM_FAMILY: &[&str] = &["npm", "yarn", "yarn-workspace"];

impl OssIssue {
    fn upgrade_target(&self) -> Option<&str> {
        match self.upgrade_path.get(1) {
            Some(UpgradeStep::Package(package)) => Some(package),
            _ => None,
        }
    }

    pub fn upgrade_message(&self) -> Option<String> {
        self.upgrade_target()
            .map(|package| format!("Upgrade to {package}"))
    }

    /// The upgrade path already points at what is installed, so only a
    /// refreshed lockfile or reinstall can pick up the fix.
    pub fn is_outdated(&self) -> bool {
        match (self.upgrade_target(), self.from.get(1)) {
            (Some(upgrade), Some(installed)) => upgrade == installed,
            _ => false,
        }
    }

    pub fn outdated_dependency_message(&self) -> String {
        let advice = if NPM_FAMILY.contains(&self.package_manager.as_str()) {
            "Try relocking your lockfile or deleting node_modules and reinstalling your \
             dependencies. If the problem persists, one of your dependencies may be bundling \
             outdated modules."
        } else {
            "Try reinstalling your dependencies. If the problem persists, one of your \
             dependencies may be bundling outdated modules."
        };
        format!(
            "Your dependencies are out of date, otherwise you would be using a newer {name} \
             than {name}@{version}. {advice}",
            name = self.name,
            version = self.version,
        )
    }

    pub fn remediation(&self) -> String {
        if !(self.is_upgradable || self.is_patchable) {
            return String::new();
        }
        let upgrade = self.upgrade_message().unwrap_or_default();
        if self.is_outdated() && !self.is_patchable {
            self.outdated_dependency_message()
        } else {
            upgrade
        }
    }
}
