//! Project wiring
//!
//! | project        | session            | depends on |
//! |----------------|--------------------|------------|
//! | `setup`        | signs in, saves it | -          |
//! | `e2e`          | saved session      | `setup`    |
//! | `auth`         | clean              | -          |
//! | `problem-user` | clean              | -          |
//! | `api`          | no browser         | -          |

use saucedemo_common::SuiteConfig;
use saucedemo_e2e::Project;

use crate::specs::{
    api, authentication, checkout, navigation, problem_user, product_catalog, setup,
    shopping_cart,
};

pub const SETUP: &str = "setup";
pub const E2E: &str = "e2e";
pub const AUTH: &str = "auth";
pub const PROBLEM_USER: &str = "problem-user";
pub const API: &str = "api";

/// Every project of the suite, dependencies first
pub fn all(config: &SuiteConfig) -> Vec<Project> {
    let mut api_project = Project::new(API).without_browser();
    for suite in api::suites() {
        api_project = api_project.suite(suite);
    }

    vec![
        Project::new(SETUP).suite(setup::suite(config.auth_file.clone())),
        Project::new(E2E)
            .storage_state(config.auth_file.clone())
            .depends_on(SETUP)
            .suite(navigation::suite())
            .suite(shopping_cart::suite())
            .suite(checkout::suite())
            .suite(product_catalog::suite()),
        Project::new(AUTH)
            .suite(authentication::login())
            .suite(authentication::logout())
            .suite(authentication::validation()),
        Project::new(PROBLEM_USER).suite(problem_user::suite()),
        api_project,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use saucedemo_e2e::{runner, Expectation, RunOptions};
    use std::path::PathBuf;
    use test_case::test_case;

    fn project(name: &str) -> Project {
        all(&SuiteConfig::default())
            .into_iter()
            .find(|p| p.name == name)
            .unwrap()
    }

    #[test_case(SETUP => 1)]
    #[test_case(E2E => 7 + 9 + 8 + 7)]
    #[test_case(AUTH => 4 + 1 + 3)]
    #[test_case(PROBLEM_USER => 4)]
    #[test_case(API => 13)]
    fn test_project_sizes(name: &str) -> usize {
        project(name).test_count()
    }

    #[test]
    fn test_e2e_reuses_setup_session() {
        let e2e = project(E2E);
        assert_eq!(e2e.dependencies, [SETUP]);
        assert_eq!(e2e.storage_state, Some(PathBuf::from(".auth/user.json")));
        assert!(project(SETUP).storage_state.is_none());
        assert!(project(AUTH).storage_state.is_none());
        assert!(!project(API).browser);
    }

    #[test]
    fn test_known_failures() {
        let known: usize = all(&SuiteConfig::default())
            .iter()
            .flat_map(|p| &p.suites)
            .flat_map(|s| &s.tests)
            .filter(|t| t.expectation == Expectation::Fail)
            .count();
        assert_eq!(known, 3);
    }

    #[test]
    fn test_smoke_tags() {
        let config = SuiteConfig::default();
        let projects = all(&config);
        let options = RunOptions::from_config(&config).grep("@smoke").unwrap();

        let planned = runner::list(&projects, &options).unwrap();
        let titles: Vec<_> = planned
            .iter()
            .filter(|t| t.project != SETUP)
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(
            titles,
            [
                "Add single item to cart @smoke",
                "View cart with items @smoke",
                "Complete checkout successfully @smoke",
                "Successful login with standard user @smoke",
            ]
        );
        assert!(planned.iter().all(|t| t.project == SETUP || t.tags == ["@smoke"]));
    }

    #[test]
    fn test_selecting_e2e_pulls_in_setup() {
        let config = SuiteConfig::default();
        let mut options = RunOptions::from_config(&config);
        options.projects = vec![E2E.to_string()];

        let planned = runner::list(&all(&config), &options).unwrap();
        assert_eq!(planned[0].project, SETUP);
        assert!(planned[1..].iter().all(|t| t.project == E2E));
    }

    #[test]
    fn test_custom_auth_file() {
        let config = SuiteConfig {
            auth_file: PathBuf::from("/tmp/session.json"),
            ..Default::default()
        };
        assert_eq!(
            project_from(&config, E2E).storage_state,
            Some(PathBuf::from("/tmp/session.json"))
        );
    }

    fn project_from(config: &SuiteConfig, name: &str) -> Project {
        all(config).into_iter().find(|p| p.name == name).unwrap()
    }
}
