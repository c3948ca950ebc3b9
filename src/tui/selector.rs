//! Selection boundary
//!
//! The discovery core only needs "pick one of N labeled items"; the
//! interactive picker is one implementation of [`Selector`].

use async_trait::async_trait;
use tracing::info;

use crate::discovery::Project;
use crate::error::{Error, Result, TuiError};

/// An item offered for selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    /// Text shown in the list and matched against the query
    pub label: String,
    /// Detail text for the highlighted item
    pub preview: String,
}

impl From<&Project> for SelectionItem {
    fn from(project: &Project) -> Self {
        Self {
            label: project.name.clone(),
            preview: project.preview(),
        }
    }
}

/// Chooses one item out of a list
#[async_trait(?Send)]
pub trait Selector {
    /// Index of the chosen item, or `None` if the user cancelled
    async fn select(&mut self, items: &[SelectionItem]) -> Result<Option<usize>>;
}

/// Let the user choose a project.
///
/// When `query` names exactly one project (case-insensitive) it is returned
/// without asking the selector.
pub async fn select_project<'a, S>(
    selector: &mut S,
    projects: &'a [Project],
    query: Option<&str>,
) -> Result<&'a Project>
where
    S: Selector + ?Sized,
{
    if let Some(query) = query {
        let mut exact = projects
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(query));
        if let (Some(project), None) = (exact.next(), exact.next()) {
            info!("'{}' matches project {:?} exactly", query, project.full_path);
            return Ok(project);
        }
    }

    let items: Vec<SelectionItem> = projects.iter().map(SelectionItem::from).collect();

    match selector.select(&items).await? {
        Some(index) => {
            let project = projects.get(index).ok_or_else(|| {
                TuiError::EventError(format!("selected index {} out of range", index))
            })?;
            info!("Selected project '{}'", project.name);
            Ok(project)
        }
        None => Err(Error::SelectionCancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Selector that returns a fixed answer and remembers what it was shown
    struct FixedSelector {
        answer: Option<usize>,
        shown: Vec<SelectionItem>,
    }

    #[async_trait(?Send)]
    impl Selector for FixedSelector {
        async fn select(&mut self, items: &[SelectionItem]) -> Result<Option<usize>> {
            self.shown = items.to_vec();
            Ok(self.answer)
        }
    }

    fn projects() -> Vec<Project> {
        ["api", "API-docs", "web"]
            .iter()
            .map(|n| {
                Project::new(
                    *n,
                    PathBuf::from(format!("/home/u/code/{}", n)),
                    PathBuf::from(format!("code/{}", n)),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_selected_index_maps_to_project() {
        let projects = projects();
        let mut selector = FixedSelector { answer: Some(2), shown: vec![] };

        let project = select_project(&mut selector, &projects, None).await.unwrap();

        assert_eq!(project.name, "web");
        assert_eq!(selector.shown.len(), 3);
        assert!(selector.shown[0].preview.contains("/home/u/code/api"));
    }

    #[tokio::test]
    async fn test_cancel_is_an_error() {
        let projects = projects();
        let mut selector = FixedSelector { answer: None, shown: vec![] };

        let err = select_project(&mut selector, &projects, None).await.unwrap_err();
        assert!(matches!(err, Error::SelectionCancelled));
    }

    #[tokio::test]
    async fn test_exact_query_skips_selector() {
        let projects = projects();
        let mut selector = FixedSelector { answer: None, shown: vec![] };

        let project = select_project(&mut selector, &projects, Some("WEB")).await.unwrap();

        assert_eq!(project.name, "web");
        assert!(selector.shown.is_empty());
    }

    #[tokio::test]
    async fn test_ambiguous_query_asks_selector() {
        let mut projects = projects();
        projects.push(Project::new(
            "web",
            PathBuf::from("/srv/web"),
            PathBuf::from("../../srv/web"),
        ));
        let mut selector = FixedSelector { answer: Some(3), shown: vec![] };

        let project = select_project(&mut selector, &projects, Some("web")).await.unwrap();

        assert_eq!(project.full_path, PathBuf::from("/srv/web"));
        assert_eq!(selector.shown.len(), 4);
    }

    #[tokio::test]
    async fn test_out_of_range_index() {
        let projects = projects();
        let mut selector = FixedSelector { answer: Some(9), shown: vec![] };

        let err = select_project(&mut selector, &projects, None).await.unwrap_err();
        assert!(matches!(err, Error::Tui(TuiError::EventError(_))));
    }
}
