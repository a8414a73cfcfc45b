use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's parsed `Cargo.toml`.
///
/// Used to find a path to `vc_codec` that is valid from the crate invoking
/// the derive.
///
/// # Resolution rules
///
/// 1. If `vc_codec` is listed in `dependencies`, return `::vc_codec`.
/// 2. If `vc_bridge` is listed in `dependencies`, return `::vc_bridge::codec`.
/// 3. Repeat step 1-2 in `dev-dependencies`.
/// 4. Otherwise, fall back to `::vc_codec`.
///
/// `vc_codec` itself declares `extern crate self as vc_codec;`, so the
/// fallback also works inside its own tests.
#[derive(Debug)]
pub(crate) struct Manifest {
    manifest: Document<Box<str>>,
    modified_time: SystemTime,
}

const CODEC_NAME: &str = "vc_codec";
const BRIDGE_NAME: &str = "vc_bridge";
const BRIDGE_MODULE: &str = "codec";

impl Manifest {
    #[inline(never)]
    fn get_manifest_path() -> PathBuf {
        env::var_os("CARGO_MANIFEST_DIR")
            .map(|path| {
                let mut path = PathBuf::from(path);
                path.push("Cargo.toml");
                assert!(
                    path.exists(),
                    "Cargo manifest does not exist at path {}",
                    path.display(),
                );
                path
            })
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.")
    }

    #[inline(never)]
    fn get_manifest_modified_time(
        cargo_manifest_path: &Path,
    ) -> Result<SystemTime, std::io::Error> {
        std::fs::metadata(cargo_manifest_path).and_then(|metadata| metadata.modified())
    }

    #[inline(never)]
    fn read_manifest(path: &Path) -> Document<Box<str>> {
        let manifest = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        Document::parse(manifest)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    #[inline]
    fn parse_path(path: &str) -> syn::Path {
        syn::parse_str(path).unwrap_or_else(|_| panic!("`{path}` is not a valid path"))
    }

    fn find_in_deps(deps: &Table) -> Option<syn::Path> {
        if deps.contains_key(CODEC_NAME) {
            return Some(Self::parse_path(&format!("::{CODEC_NAME}")));
        }
        if deps.contains_key(BRIDGE_NAME) {
            return Some(Self::parse_path(&format!("::{BRIDGE_NAME}::{BRIDGE_MODULE}")));
        }
        None
    }

    /// Returns the path of `vc_codec` as seen from the caller.
    #[inline(never)]
    pub(crate) fn codec_path(&self) -> syn::Path {
        if let Some(Item::Table(deps)) = self.manifest.get("dependencies")
            && let Some(val) = Self::find_in_deps(deps)
        {
            return val;
        }

        if let Some(Item::Table(deps)) = self.manifest.get("dev-dependencies")
            && let Some(val) = Self::find_in_deps(deps)
        {
            return val;
        }

        Self::parse_path(&format!("::{CODEC_NAME}"))
    }

    /// Runs `func` on the caller's manifest.
    ///
    /// Manifests are cached per path and re-read when the file changes.
    pub(crate) fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let manifest_path = Self::get_manifest_path();
        let modified_time = Self::get_manifest_modified_time(&manifest_path)
            .expect("The Cargo.toml should have a modified time.");

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);

        if let Some(manifest) = manifests.get(&manifest_path)
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }

        drop(manifests);

        let manifest = Manifest {
            manifest: Self::read_manifest(&manifest_path),
            modified_time,
        };

        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(manifest_path, manifest);

        result
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use quote::ToTokens;
    use toml_edit::Document;

    use super::Manifest;

    fn codec_path(toml: &str) -> String {
        let manifest = Manifest {
            manifest: Document::parse(Box::<str>::from(toml)).unwrap(),
            modified_time: SystemTime::UNIX_EPOCH,
        };
        manifest.codec_path().to_token_stream().to_string().replace(' ', "")
    }

    #[test]
    fn resolves_direct_dependency() {
        assert_eq!(codec_path("[dependencies]\nvc_codec = \"0.1\"\n"), "::vc_codec");
    }

    #[test]
    fn resolves_through_bridge() {
        assert_eq!(
            codec_path("[dev-dependencies]\nvc_bridge = \"0.1\"\n"),
            "::vc_bridge::codec"
        );
    }

    #[test]
    fn falls_back_to_crate_name() {
        assert_eq!(codec_path("[package]\nname = \"demo\"\n"), "::vc_codec");
    }
}
