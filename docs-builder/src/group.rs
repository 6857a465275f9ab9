//! Grouping by category and static document injection.

use crate::config::StaticDocConfig;
use crate::error::{DocsError, Result};
use crate::model::{DocEntry, GroupItem, GroupedDocs, StaticDoc};
use futures::future::try_join_all;
use std::path::Path;

/// Partition entries into the configured categories.
///
/// Every configured category is present in the result, in configured order,
/// even when it receives no entries.
pub fn group(entries: Vec<DocEntry>, groups: &[String]) -> Result<GroupedDocs> {
    let mut grouped: GroupedDocs = groups.iter().map(|g| (g.clone(), Vec::new())).collect();

    for entry in entries {
        let Some(category) = entry.category.as_deref() else {
            return Err(DocsError::MissingCategory {
                name: entry.title.clone(),
            });
        };
        let Some(list) = grouped.get_mut(category) else {
            return Err(DocsError::UnknownCategory {
                name: entry.title.clone(),
                category: category.to_string(),
            });
        };
        list.push(GroupItem::Entry(entry));
    }

    Ok(grouped)
}

/// Load static documents concurrently and append each one after the
/// source-derived entries of its category.
pub async fn inject_static(
    mut grouped: GroupedDocs,
    docs: &[StaticDocConfig],
    root: &Path,
) -> Result<GroupedDocs> {
    let loaded = try_join_all(docs.iter().map(|doc| load_static(doc, root))).await?;

    for doc in loaded {
        let Some(list) = grouped.get_mut(&doc.category) else {
            return Err(DocsError::UnknownCategory {
                name: doc.path.clone(),
                category: doc.category.clone(),
            });
        };
        list.push(GroupItem::Static(doc));
    }

    Ok(grouped)
}

async fn load_static(doc: &StaticDocConfig, root: &Path) -> Result<StaticDoc> {
    let path = root.join(&doc.path);
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| DocsError::StaticDoc {
            path: path.clone(),
            source,
        })?;
    tracing::debug!(path = %path.display(), category = %doc.category, "loaded static doc");

    Ok(StaticDoc {
        kind: doc.kind.clone(),
        category: doc.category.clone(),
        path: doc.path.to_string_lossy().to_string(),
        content,
        meta: doc.meta.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble;
    use crate::config::PackageConfig;
    use crate::model::RawDocRecord;
    use serde_json::{json, Map};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn entry(name: &str, category: Option<&str>) -> DocEntry {
        let record =
            RawDocRecord::from_value(json!({ "name": name, "category": category })).unwrap();
        assemble(record, &PackageConfig::default())
    }

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn titles(items: &[GroupItem]) -> Vec<String> {
        items
            .iter()
            .map(|item| match item {
                GroupItem::Entry(e) => e.title.clone(),
                GroupItem::Static(s) => s.path.clone(),
            })
            .collect()
    }

    fn static_doc(category: &str, path: &str) -> StaticDocConfig {
        let mut meta = Map::new();
        meta.insert("title".into(), json!(path));
        StaticDocConfig {
            kind: "markdown".into(),
            category: category.into(),
            path: PathBuf::from(path),
            meta,
        }
    }

    #[test]
    fn every_group_present_in_order() {
        let grouped = group(
            vec![entry("addDays", Some("Day Helpers"))],
            &groups(&["General", "Day Helpers", "Week Helpers"]),
        )
        .unwrap();
        let keys: Vec<_> = grouped.keys().map(String::as_str).collect();
        assert_eq!(keys, ["General", "Day Helpers", "Week Helpers"]);
        assert!(grouped["General"].is_empty());
        assert!(grouped["Week Helpers"].is_empty());
        assert_eq!(grouped["Day Helpers"].len(), 1);
    }

    #[test]
    fn entries_keep_input_order() {
        let grouped = group(
            vec![
                entry("subDays", Some("Day Helpers")),
                entry("startOfWeek", Some("Week Helpers")),
                entry("addDays", Some("Day Helpers")),
            ],
            &groups(&["Day Helpers", "Week Helpers"]),
        )
        .unwrap();
        assert_eq!(titles(&grouped["Day Helpers"]), ["subDays", "addDays"]);
    }

    #[test]
    fn unknown_category_is_an_error() {
        let err = group(vec![entry("addDays", Some("Nope"))], &groups(&["General"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "entry `addDays` references unconfigured category `Nope`"
        );
    }

    #[test]
    fn missing_category_is_an_error() {
        let err = group(vec![entry("addDays", None)], &groups(&["General"])).unwrap_err();
        assert!(matches!(err, DocsError::MissingCategory { .. }));
    }

    #[tokio::test]
    async fn static_docs_follow_generated_entries() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("intro.md"), "# Intro\n").unwrap();
        fs::write(dir.path().join("faq.md"), "# FAQ\n").unwrap();

        let grouped = group(
            vec![
                entry("isValid", Some("General")),
                entry("addDays", Some("Day Helpers")),
            ],
            &groups(&["General", "Day Helpers"]),
        )
        .unwrap();
        let docs = [
            static_doc("Day Helpers", "faq.md"),
            static_doc("General", "intro.md"),
        ];
        let grouped = inject_static(grouped, &docs, dir.path()).await.unwrap();

        assert_eq!(titles(&grouped["General"]), ["isValid", "intro.md"]);
        assert_eq!(titles(&grouped["Day Helpers"]), ["addDays", "faq.md"]);

        let GroupItem::Static(intro) = &grouped["General"][1] else {
            panic!("expected a static doc");
        };
        assert_eq!(intro.content, "# Intro\n");
        assert_eq!(intro.kind, "markdown");
        let json = serde_json::to_value(intro).unwrap();
        assert_eq!(json["type"], "markdown");
        assert_eq!(json["title"], "intro.md");
        assert_eq!(json["category"], "General");
    }

    #[tokio::test]
    async fn static_docs_keep_descriptor_order_within_category() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.md"), "b").unwrap();
        fs::write(dir.path().join("a.md"), "a").unwrap();

        let grouped = group(vec![], &groups(&["General"])).unwrap();
        let docs = [static_doc("General", "b.md"), static_doc("General", "a.md")];
        let grouped = inject_static(grouped, &docs, dir.path()).await.unwrap();
        assert_eq!(titles(&grouped["General"]), ["b.md", "a.md"]);
    }

    #[tokio::test]
    async fn unreadable_static_doc_is_fatal() {
        let dir = TempDir::new().unwrap();
        let grouped = group(vec![], &groups(&["General"])).unwrap();
        let err = inject_static(grouped, &[static_doc("General", "missing.md")], dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, DocsError::StaticDoc { .. }));
    }
}
