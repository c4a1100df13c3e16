//! Mock native bridge script
//!
//! The bundled UI talks to its host through `window.HOOK` (settings calls)
//! and `window.Android` (lifecycle callbacks). In the browser neither exists,
//! so every served page gets an inline script that defines both objects over
//! a request-scoped [`BridgeSnapshot`].

use serde::Serialize;
use std::borrow::Cow;

use crate::catalog::{ModuleMetadata, TabDescriptor};
use crate::error::Result;
use crate::overrides::FriendRecord;

/// Default value reported by `getBuildInfo()`.
pub const DEFAULT_BUILD_INFO: &str = "Sesame-TK:Byseven-Offical-Debug";

/// Value `setModel()` acknowledges every payload with.
pub const SET_MODEL_ACK: &str = "SUCCESS";

/// Data exposed through the bridge for one request.
#[derive(Debug, Clone)]
pub struct BridgeSnapshot<'a> {
    pub tabs: &'a [TabDescriptor],
    /// Baseline catalog, or a merged copy when overrides are applied
    pub modules: Cow<'a, ModuleMetadata>,
    pub friends: Vec<FriendRecord>,
}

/// JSON text safe to place inside a `<script>` element.
///
/// Every `<` is written as the JSON escape `\u003c`, so neither `</script>`
/// nor `<!--` can appear in the emitted text.
fn script_literal<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

/// Render the inline `<script>` that installs the mock bridge.
///
/// Output depends only on the inputs.
pub fn build_bridge_script(snapshot: &BridgeSnapshot<'_>, build_info: &str) -> Result<String> {
    let tabs = script_literal(snapshot.tabs)?;
    let models = script_literal(&*snapshot.modules)?;
    let friends = script_literal(&snapshot.friends)?;
    let build_info = script_literal(build_info)?;

    Ok(format!(
        r#"
<script>
(function() {{
    console.log("[webui-preview] mock bridge installed");

    var MOCK_TABS = {tabs};
    var MOCK_MODELS = {models};
    var MOCK_FRIENDS = {friends};
    var BUILD_INFO = {build_info};

    function hostLog(message) {{
        console.log("[HOOK] log:", message);
    }}

    window.HOOK = {{
        getTabs: function() {{
            return JSON.stringify(MOCK_TABS);
        }},

        getBuildInfo: function() {{
            return BUILD_INFO;
        }},

        isNightMode: function() {{
            return true;
        }},

        getModel: function(modelCode) {{
            console.log("[HOOK] getModel:", modelCode);
            if (!Object.prototype.hasOwnProperty.call(MOCK_MODELS, modelCode)) {{
                return "[]";
            }}
            return JSON.stringify(MOCK_MODELS[modelCode]);
        }},

        setModel: function(modelCode, jsonText) {{
            console.log("[HOOK] setModel:", modelCode);
            try {{
                console.log("[HOOK] payload:", JSON.parse(jsonText));
            }} catch (e) {{
                console.log("[HOOK] payload (not JSON):", jsonText);
            }}
            return "{ack}";
        }},

        getField: function(modelCode, fieldCode) {{
            console.log("[HOOK] getField:", modelCode, fieldCode);
            return JSON.stringify({{ code: fieldCode, expandValue: MOCK_FRIENDS }});
        }},

        saveOnExit: function() {{
            console.log("[HOOK] saveOnExit");
            alert("Mock host: settings saved, closing page");
            return true;
        }},

        log: hostLog,
        Log: hostLog
    }};

    window.Android = {{
        onBackPressed: function() {{
            console.log("[Android] onBackPressed");
        }},
        onExit: function() {{
            console.log("[Android] onExit");
        }}
    }};
}})();
</script>
"#,
        ack = SET_MODEL_ACK,
    ))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn friends() -> Vec<FriendRecord> {
        vec![
            FriendRecord {
                id: "2088001".into(),
                name: "超|程超(159******79)".into(),
            },
            FriendRecord {
                id: "2088002".into(),
                name: "u2".into(),
            },
        ]
    }

    fn snapshot(catalog: &Catalog) -> BridgeSnapshot<'_> {
        BridgeSnapshot {
            tabs: catalog.tabs(),
            modules: Cow::Borrowed(catalog.modules()),
            friends: friends(),
        }
    }

    fn script(catalog: &Catalog) -> String {
        build_bridge_script(&snapshot(catalog), DEFAULT_BUILD_INFO).unwrap()
    }

    /// Parse the literal assigned to `var {name} = ...;` in the script.
    fn literal(script: &str, name: &str) -> Value {
        let prefix = format!("var {name} = ");
        let line = script
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with(&prefix))
            .unwrap();
        serde_json::from_str(line[prefix.len()..].trim_end_matches(';')).unwrap()
    }

    #[test]
    fn mock_models_keep_catalog_field_order() {
        let catalog = Catalog::embedded().unwrap();
        let models = literal(&script(&catalog), "MOCK_MODELS");
        let models = models.as_object().unwrap();

        let module_codes: Vec<_> = models.keys().map(String::as_str).collect();
        let expected_modules: Vec<_> = catalog.modules().keys().map(String::as_str).collect();
        assert_eq!(module_codes, expected_modules);

        for (module_code, fields) in catalog.modules() {
            let codes: Vec<_> = models[module_code]
                .as_array()
                .unwrap()
                .iter()
                .map(|f| f["code"].as_str().unwrap())
                .collect();
            let expected: Vec<_> = fields.iter().map(|f| f.code.as_str()).collect();
            assert_eq!(codes, expected, "{module_code}");
        }
    }

    #[test]
    fn get_model_answers_unknown_modules_with_empty_list() {
        let catalog = Catalog::embedded().unwrap();
        let script = script(&catalog);
        assert!(script.contains(
            r#"        getModel: function(modelCode) {
            console.log("[HOOK] getModel:", modelCode);
            if (!Object.prototype.hasOwnProperty.call(MOCK_MODELS, modelCode)) {
                return "[]";
            }
            return JSON.stringify(MOCK_MODELS[modelCode]);
        },"#
        ));
    }

    #[test]
    fn get_field_always_answers_with_friends() {
        let catalog = Catalog::embedded().unwrap();
        let script = script(&catalog);
        assert!(script.contains(
            r#"        getField: function(modelCode, fieldCode) {
            console.log("[HOOK] getField:", modelCode, fieldCode);
            return JSON.stringify({ code: fieldCode, expandValue: MOCK_FRIENDS });
        },"#
        ));
        assert_eq!(
            literal(&script, "MOCK_FRIENDS"),
            serde_json::to_value(friends()).unwrap()
        );
    }

    #[test]
    fn get_tabs_returns_mock_tabs() {
        let catalog = Catalog::embedded().unwrap();
        let script = script(&catalog);
        assert!(script.contains(
            r#"        getTabs: function() {
            return JSON.stringify(MOCK_TABS);
        },"#
        ));
        assert_eq!(
            literal(&script, "MOCK_TABS"),
            serde_json::to_value(catalog.tabs()).unwrap()
        );
    }

    #[test]
    fn script_defines_bridge_surface() {
        let catalog = Catalog::embedded().unwrap();
        let script = script(&catalog);

        assert!(script.trim_start().starts_with("<script>"));
        assert!(script.trim_end().ends_with("</script>"));
        for member in [
            "getTabs:",
            "getBuildInfo:",
            "isNightMode:",
            "getModel:",
            "setModel:",
            "getField:",
            "saveOnExit:",
            "log: hostLog",
            "Log: hostLog",
            "window.Android",
            "onBackPressed:",
            "onExit:",
        ] {
            assert!(script.contains(member), "missing {member}");
        }
        assert!(script.contains(r#"return "SUCCESS";"#));
    }

    #[test]
    fn build_info_is_embedded() {
        let catalog = Catalog::embedded().unwrap();
        let script = build_bridge_script(&snapshot(&catalog), "custom-build").unwrap();
        assert_eq!(literal(&script, "BUILD_INFO"), "custom-build");
    }

    #[test]
    fn script_is_deterministic() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(script(&catalog), script(&catalog));
    }

    #[test]
    fn markup_in_data_cannot_break_out_of_the_script() {
        let catalog = Catalog::new(vec![], ModuleMetadata::new());
        let names = ["</script><script>alert(1)", "<!--<script>", "a<b"];
        let snapshot = BridgeSnapshot {
            tabs: catalog.tabs(),
            modules: Cow::Borrowed(catalog.modules()),
            friends: names
                .iter()
                .map(|name| FriendRecord {
                    id: "x".into(),
                    name: name.to_string(),
                })
                .collect(),
        };
        let script = build_bridge_script(&snapshot, DEFAULT_BUILD_INFO).unwrap();

        assert_eq!(script.matches("<script>").count(), 1);
        assert_eq!(script.matches("</script>").count(), 1);
        assert!(!script.contains("<!--"));

        let parsed = literal(&script, "MOCK_FRIENDS");
        for (i, name) in names.iter().enumerate() {
            assert_eq!(parsed[i]["name"], *name);
        }
    }
}
