// Copyright 2023-2024 the docver developers
// Licensed under the MIT License.

//! Emitting the JSON manifest consumed by the version-switcher widget.
//!
//! The widget fetches a single JSON file listing every published
//! documentation branch and the URL of its tree, plus a synthetic trailing
//! `latest` entry pointing at the site root.

use anyhow::anyhow;
use serde::Serialize;
use std::{fs, path::Path};

use crate::{atry, errors::Result};

/// One documentation version: a branch name and the URL of its doc tree.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BranchRecord {
    pub name: String,
    pub url: String,
}

/// The manifest as serialized to disk.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Manifest {
    pub branches: Vec<BranchRecord>,
}

impl Manifest {
    /// Build the manifest for the given branch names, in input order. Each
    /// branch maps to `<prefix>en/<branch>/`; the trailing `latest` record
    /// maps to the bare prefix and is always appended.
    pub fn from_branches(branches: &[String], url_prefix: &str) -> Result<Self> {
        if branches.is_empty() {
            return Err(anyhow!("at least one branch name is required"));
        }

        let mut records: Vec<BranchRecord> = branches
            .iter()
            .map(|name| BranchRecord {
                name: name.clone(),
                url: format!("{}en/{}/", url_prefix, name),
            })
            .collect();

        records.push(BranchRecord {
            name: "latest".to_owned(),
            url: url_prefix.to_owned(),
        });

        Ok(Manifest { branches: records })
    }

    /// Serialize with 2-space indentation.
    pub fn to_json_text(&self) -> Result<String> {
        Ok(atry!(
            serde_json::to_string_pretty(self);
            ["could not serialize the branch manifest"]
        ))
    }

    /// Write the manifest to the given path, overwriting any existing file.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = self.to_json_text()?;

        atry!(
            fs::write(&path, text);
            ["failed to write manifest file `{}`", path.as_ref().display()]
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn records_follow_input_order_with_trailing_latest() {
        let m = Manifest::from_branches(&names(&["2.2.x", "1.0.x", "master"]), "/dgl_docs/")
            .unwrap();

        assert_eq!(m.branches.len(), 4);
        assert_eq!(m.branches[0].name, "2.2.x");
        assert_eq!(m.branches[0].url, "/dgl_docs/en/2.2.x/");
        assert_eq!(m.branches[1].name, "1.0.x");
        assert_eq!(m.branches[2].name, "master");
        assert_eq!(
            m.branches[3],
            BranchRecord {
                name: "latest".to_owned(),
                url: "/dgl_docs/".to_owned(),
            }
        );
    }

    #[test]
    fn serialized_form_matches_widget_schema() {
        let m = Manifest::from_branches(&names(&["1.0.x", "1.1.x"]), "/dgl_docs/").unwrap();
        let value: serde_json::Value = serde_json::from_str(&m.to_json_text().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "branches": [
                    { "name": "1.0.x", "url": "/dgl_docs/en/1.0.x/" },
                    { "name": "1.1.x", "url": "/dgl_docs/en/1.1.x/" },
                    { "name": "latest", "url": "/dgl_docs/" },
                ]
            })
        );
    }

    #[test]
    fn custom_prefix_is_used_verbatim() {
        let m = Manifest::from_branches(&names(&["main"]), "/other_docs/").unwrap();
        assert_eq!(m.branches[0].url, "/other_docs/en/main/");
        assert_eq!(m.branches[1].url, "/other_docs/");
    }

    #[test]
    fn empty_branch_list_is_rejected() {
        assert!(Manifest::from_branches(&[], "/dgl_docs/").is_err());
    }

    #[test]
    fn write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("branches.json");
        fs::write(&path, "stale").unwrap();

        let m = Manifest::from_branches(&names(&["master"]), "/dgl_docs/").unwrap();
        m.write(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["branches"].as_array().unwrap().len(), 2);
    }
}
