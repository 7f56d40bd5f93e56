// Copyright 2023-2024 the docver developers
// Licensed under the MIT License.

//! The docver configuration file.
//!
//! Everything here has a sensible built-in default, so the configuration
//! file is entirely optional: it exists so that a docs tree with unusual
//! paths or URL layout can pin its settings next to the build scripts
//! instead of threading flags through every CI invocation.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use crate::{atry, errors::Result};

/// Default path of the version-selector template file.
pub const DEFAULT_TEMPLATE_PATH: &str = "./version_template.html";

/// Default class of the anchor element that the sidebar is inserted after.
/// This is the main layout container emitted by the Read-the-Docs theme.
pub const DEFAULT_ANCHOR_CLASS: &str = "wy-grid-for-nav";

/// Default file name of the generated branch manifest.
pub const DEFAULT_OUTPUT_PATH: &str = "branches.json";

/// Default URL prefix under which the versioned doc trees are served.
pub const DEFAULT_URL_PREFIX: &str = "/dgl_docs/";

/// The configuration file structures as explicitly serialized into the TOML
/// format. Every field is optional on disk.
mod syntax {
    use serde::Deserialize;

    #[derive(Clone, Debug, Default, Deserialize)]
    pub struct SerializedConfiguration {
        /// Settings for the `inject-sidebar` command.
        #[serde(default)]
        pub sidebar: SidebarConfiguration,

        /// Settings for the `branch-manifest` command.
        #[serde(default)]
        pub manifest: ManifestConfiguration,
    }

    #[derive(Clone, Debug, Default, Deserialize)]
    pub struct SidebarConfiguration {
        /// Path of the template fragment to inject.
        pub template_path: Option<String>,

        /// Class attribute value identifying the anchor `div`.
        pub anchor_class: Option<String>,
    }

    #[derive(Clone, Debug, Default, Deserialize)]
    pub struct ManifestConfiguration {
        /// Path of the JSON manifest to write.
        pub output_path: Option<String>,

        /// URL prefix for the versioned doc trees.
        pub url_prefix: Option<String>,
    }
}

// The rest of this module normalizes the on-disk format into runtime forms
// with the defaults filled in.

/// Runtime settings for the sidebar injector.
#[derive(Clone, Debug)]
pub struct SidebarConfiguration {
    pub template_path: PathBuf,
    pub anchor_class: String,
}

impl Default for SidebarConfiguration {
    fn default() -> Self {
        SidebarConfiguration {
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            anchor_class: DEFAULT_ANCHOR_CLASS.to_owned(),
        }
    }
}

/// Runtime settings for the manifest generator.
#[derive(Clone, Debug)]
pub struct ManifestConfiguration {
    pub output_path: PathBuf,
    pub url_prefix: String,
}

impl Default for ManifestConfiguration {
    fn default() -> Self {
        ManifestConfiguration {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            url_prefix: DEFAULT_URL_PREFIX.to_owned(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigurationFile {
    pub sidebar: SidebarConfiguration,
    pub manifest: ManifestConfiguration,
}

impl ConfigurationFile {
    /// Load the configuration file at the given path. A file that does not
    /// exist yields the built-in defaults; a file that exists but cannot be
    /// read or parsed is an error.
    pub fn get<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut f = match File::open(&path) {
            Ok(f) => f,

            Err(e) => {
                return if e.kind() == std::io::ErrorKind::NotFound {
                    Ok(Self::default())
                } else {
                    Err(crate::errors::Error::new(e).context(format!(
                        "failed to open config file `{}`",
                        path.as_ref().display()
                    )))
                }
            }
        };

        let mut text = String::new();
        atry!(
            f.read_to_string(&mut text);
            ["failed to read config file `{}`", path.as_ref().display()]
        );

        let sercfg: syntax::SerializedConfiguration = atry!(
            toml::from_str(&text);
            ["could not parse config file `{}` as TOML", path.as_ref().display()]
        );

        Ok(Self::from_syntax(sercfg))
    }

    fn from_syntax(sercfg: syntax::SerializedConfiguration) -> Self {
        let mut cfg = ConfigurationFile::default();

        if let Some(p) = sercfg.sidebar.template_path {
            cfg.sidebar.template_path = PathBuf::from(p);
        }

        if let Some(c) = sercfg.sidebar.anchor_class {
            cfg.sidebar.anchor_class = c;
        }

        if let Some(p) = sercfg.manifest.output_path {
            cfg.manifest.output_path = PathBuf::from(p);
        }

        if let Some(u) = sercfg.manifest.url_prefix {
            cfg.manifest.url_prefix = u;
        }

        cfg
    }
}
