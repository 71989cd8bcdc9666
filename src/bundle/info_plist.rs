//! Info.plist dictionary for a bundle

use super::{APP_ICON_FILE, DOC_ICON_FILE};
use crate::profile::{InterfaceType, Profile};
use plist::{Dictionary, Value};

const PACKAGE_TYPE: &str = "APPL";
const INFO_DICTIONARY_VERSION: &str = "6.0";
const SERVICE_MESSAGE: &str = "dropService";

fn strings(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

fn string(s: impl Into<String>) -> Value {
    Value::String(s.into())
}

fn document_types(profile: &Profile) -> Value {
    let mut doc = Dictionary::new();
    doc.insert("CFBundleTypeRole".into(), string("Viewer"));
    let extensions = if profile.suffixes.is_empty() {
        vec!["*".to_string()]
    } else {
        profile.suffixes.clone()
    };
    doc.insert("CFBundleTypeExtensions".into(), strings(&extensions));
    if !profile.uniform_types.is_empty() {
        doc.insert("LSItemContentTypes".into(), strings(&profile.uniform_types));
    }
    if profile.doc_icon_path.is_some() {
        doc.insert("CFBundleTypeIconFile".into(), string(DOC_ICON_FILE));
    }
    Value::Array(vec![Value::Dictionary(doc)])
}

fn url_types(profile: &Profile) -> Value {
    let mut url = Dictionary::new();
    url.insert("CFBundleURLName".into(), string(&profile.identifier));
    url.insert("CFBundleURLSchemes".into(), strings(&profile.uri_schemes));
    Value::Array(vec![Value::Dictionary(url)])
}

fn services(profile: &Profile) -> Value {
    let mut menu_item = Dictionary::new();
    menu_item.insert("default".into(), string(format!("Process with {}", profile.name)));

    let mut send_types = Vec::new();
    if profile.accepts_files || profile.droppable {
        send_types.push(string("NSFilenamesPboardType"));
    }
    if profile.accepts_text {
        send_types.push(string("NSStringPboardType"));
    }

    let mut service = Dictionary::new();
    service.insert("NSMenuItem".into(), Value::Dictionary(menu_item));
    service.insert("NSMessage".into(), string(SERVICE_MESSAGE));
    service.insert("NSPortName".into(), string(&profile.name));
    service.insert("NSSendTypes".into(), Value::Array(send_types));
    Value::Array(vec![Value::Dictionary(service)])
}

/// Build the Info.plist dictionary. `CFBundleExecutable` is always the app name.
pub fn info_dictionary(profile: &Profile) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.insert("CFBundleName".into(), string(&profile.name));
    dict.insert("CFBundleDisplayName".into(), string(&profile.name));
    dict.insert("CFBundleIdentifier".into(), string(&profile.identifier));
    dict.insert("CFBundleShortVersionString".into(), string(&profile.version));
    dict.insert("CFBundleVersion".into(), string(&profile.version));
    dict.insert("CFBundleExecutable".into(), string(&profile.name));
    dict.insert("CFBundleIconFile".into(), string(APP_ICON_FILE));
    dict.insert("CFBundlePackageType".into(), string(PACKAGE_TYPE));
    dict.insert(
        "CFBundleInfoDictionaryVersion".into(),
        string(INFO_DICTIONARY_VERSION),
    );
    dict.insert(
        "NSHumanReadableCopyright".into(),
        string(format!("© {}", profile.author)),
    );

    if profile.run_in_background || profile.interface_type == InterfaceType::StatusMenu {
        dict.insert("LSUIElement".into(), Value::Boolean(true));
    }
    if profile.accepts_files || profile.droppable {
        dict.insert("CFBundleDocumentTypes".into(), document_types(profile));
    }
    if !profile.uri_schemes.is_empty() {
        dict.insert("CFBundleURLTypes".into(), url_types(profile));
    }
    if profile.declare_service {
        dict.insert("NSServices".into(), services(profile));
    }
    dict
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        let mut profile = Profile::default();
        profile.name = "Tool".to_string();
        profile.identifier = "org.alice.Tool".to_string();
        profile.version = "2.1".to_string();
        profile.author = "Alice".to_string();
        profile
    }

    #[test]
    fn test_required_keys() {
        let dict = info_dictionary(&profile());
        assert_eq!(dict.get("CFBundleExecutable").and_then(Value::as_string), Some("Tool"));
        assert_eq!(
            dict.get("CFBundleIdentifier").and_then(Value::as_string),
            Some("org.alice.Tool")
        );
        assert_eq!(dict.get("CFBundleShortVersionString").and_then(Value::as_string), Some("2.1"));
        assert_eq!(dict.get("CFBundleIconFile").and_then(Value::as_string), Some("AppIcon.icns"));
        assert!(dict.get("CFBundleDocumentTypes").is_none());
        assert!(dict.get("NSServices").is_none());
    }

    #[test]
    fn test_droppable_declares_document_types() {
        let mut p = profile();
        p.droppable = true;
        p.accepts_files = true;
        p.suffixes = vec!["txt".to_string(), "md".to_string()];
        p.doc_icon_path = Some("/tmp/doc.icns".into());

        let dict = info_dictionary(&p);
        let types = dict.get("CFBundleDocumentTypes").and_then(Value::as_array).unwrap();
        let doc = types[0].as_dictionary().unwrap();
        let exts: Vec<_> = doc
            .get("CFBundleTypeExtensions")
            .and_then(Value::as_array)
            .unwrap()
            .iter()
            .filter_map(Value::as_string)
            .collect();
        assert_eq!(exts, vec!["txt", "md"]);
        assert_eq!(doc.get("CFBundleTypeIconFile").and_then(Value::as_string), Some("docIcon.icns"));
    }

    #[test]
    fn test_status_menu_is_ui_element() {
        let mut p = profile();
        p.interface_type = InterfaceType::StatusMenu;
        let dict = info_dictionary(&p);
        assert_eq!(dict.get("LSUIElement").and_then(Value::as_boolean), Some(true));
    }

    #[test]
    fn test_service_and_url_schemes() {
        let mut p = profile();
        p.declare_service = true;
        p.accepts_text = true;
        p.uri_schemes = vec!["tool".to_string()];
        let dict = info_dictionary(&p);
        assert!(dict.get("NSServices").is_some());
        let urls = dict.get("CFBundleURLTypes").and_then(Value::as_array).unwrap();
        assert_eq!(urls.len(), 1);
    }
}
