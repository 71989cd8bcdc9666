//! Bundle assembly

use super::files::{self, copy_tree, create_dir, make_executable, symlink_to, write_file};
use super::icon::install_icon;
use super::info_plist::info_dictionary;
use super::resources::SharedResources;
use super::staging::Staging;
use super::{
    Bundle, BundleLayout, APP_ICON_FILE, DOC_ICON_FILE, INTERFACE_TEMPLATE_FILE,
    STATUS_ITEM_ICON_FILE,
};
use crate::error::BundleError;
use crate::profile::{encode_dictionary, Field, PlistFormat, ValidatedProfile};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Builds application bundles from validated profiles
pub struct Materializer {
    resources: SharedResources,
}

/// Created entries, recorded relative to the bundle root
struct Entries<'a> {
    layout: &'a BundleLayout,
    created: Vec<PathBuf>,
}

impl<'a> Entries<'a> {
    fn record(&mut self, path: &Path) {
        if let Ok(relative) = path.strip_prefix(self.layout.root()) {
            self.created.push(relative.to_path_buf());
        }
    }
}

impl Materializer {
    pub fn new(resources: SharedResources) -> Self {
        Self { resources }
    }

    pub fn resources(&self) -> &SharedResources {
        &self.resources
    }

    /// Create the bundle for `profile` at `destination`.
    ///
    /// Fails with `AlreadyExists` when the destination exists and the profile does
    /// not allow overwriting. On any failure the destination is left as it was.
    pub fn materialize(
        &self,
        profile: &ValidatedProfile,
        script: &Path,
        destination: &Path,
    ) -> Result<Bundle, BundleError> {
        if destination.symlink_metadata().is_ok() && !profile.overwrite {
            return Err(BundleError::AlreadyExists(destination.to_path_buf()));
        }
        if !script.is_file() {
            return Err(BundleError::MissingResource(format!(
                "script {} is not a file",
                script.display()
            )));
        }

        info!(
            name = %profile.name,
            destination = %destination.display(),
            development = profile.development_version,
            "Creating application bundle"
        );

        let staging = Staging::new(destination)?;
        let staged_layout = BundleLayout::new(staging.root());
        let created = self.assemble(profile, script, &staged_layout)?;
        let root = staging.commit(profile.overwrite)?;

        let layout = BundleLayout::new(&root);
        info!(bundle = %root.display(), entries = created.len(), "Bundle created");
        Ok(Bundle {
            executable: layout.executable(&profile.name),
            root,
            entries: created,
        })
    }

    fn assemble(
        &self,
        profile: &ValidatedProfile,
        script: &Path,
        layout: &BundleLayout,
    ) -> Result<Vec<PathBuf>, BundleError> {
        let mut entries = Entries {
            layout,
            created: Vec::new(),
        };
        let dev = profile.development_version;

        create_dir(layout.root())?;
        for dir in [layout.contents(), layout.macos(), layout.resources()] {
            create_dir(&dir)?;
            entries.record(&dir);
        }

        // Contents/Info.plist is always XML
        let info = encode_dictionary(info_dictionary(profile), PlistFormat::Xml)?;
        write_file(&layout.info_plist(), &info)?;
        entries.record(&layout.info_plist());

        let settings = profile.to_dictionary_filtered(Field::is_runtime);
        let settings = encode_dictionary(
            settings,
            PlistFormat::for_xml_flag(profile.use_xml_plist_format),
        )?;
        write_file(&layout.app_settings(), &settings)?;
        entries.record(&layout.app_settings());

        let resources = layout.resources();
        let app_icon = resources.join(APP_ICON_FILE);
        match &profile.icon_path {
            Some(icon) => install_icon(icon, &app_icon)?,
            None => self.resources.default_icon.install(&app_icon)?,
        }
        entries.record(&app_icon);
        for (source, name) in [
            (&profile.doc_icon_path, DOC_ICON_FILE),
            (&profile.status_item_icon, STATUS_ITEM_ICON_FILE),
        ] {
            if let Some(source) = source {
                let dest = resources.join(name);
                install_icon(source, &dest)?;
                entries.record(&dest);
            }
        }

        let template = resources.join(INTERFACE_TEMPLATE_FILE);
        self.resources.interface_template.install(&template)?;
        entries.record(&template);

        let script_dest = layout.script();
        if dev {
            symlink_to(script, &script_dest)?;
        } else {
            files::copy_file(script, &script_dest)?;
            make_executable(&script_dest)?;
        }
        entries.record(&script_dest);

        for source in &profile.bundled_files {
            let name = source
                .file_name()
                .ok_or_else(|| BundleError::MissingResource(format!("{}", source.display())))?;
            let dest = resources.join(name);
            if dest.symlink_metadata().is_ok() {
                return Err(BundleError::NameCollision(name.to_string_lossy().into_owned()));
            }
            if dev {
                symlink_to(source, &dest)?;
                entries.record(&dest);
            } else {
                for created in copy_tree(source, &dest)? {
                    entries.record(&created);
                }
            }
        }

        let executable = layout.executable(&profile.name);
        if dev {
            symlink_to(&self.resources.launcher, &executable)?;
        } else {
            files::copy_file(&self.resources.launcher, &executable)?;
            make_executable(&executable)?;
            if profile.optimize_application {
                self.strip(&executable);
            }
        }
        entries.record(&executable);

        debug!(entries = entries.created.len(), "Assembled bundle contents");
        Ok(entries.created)
    }

    /// Strip the launcher copy. Failure is not fatal.
    fn strip(&self, executable: &Path) {
        let tool = &self.resources.strip_tool;
        match Command::new(tool).arg("-x").arg(executable).status() {
            Ok(status) if status.success() => {
                debug!(executable = %executable.display(), "Stripped launcher")
            }
            Ok(status) => warn!(tool = %tool.display(), %status, "Strip tool failed"),
            Err(e) => warn!(tool = %tool.display(), error = %e, "Unable to run strip tool"),
        }
    }
}
