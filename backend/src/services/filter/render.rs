use crate::error::Result;
use common::model::params::ParameterModel;
use common::model::user::UserParameterModel;
use common::requests::{AmdCall, Injection};

/// Client module and entry point queued on the page.
pub const AMD_MODULE: &str = "filter_amanote/main";
pub const AMD_FUNCTION: &str = "init";

/// Global the client reads its page parameters from.
pub const PARAMS_GLOBAL: &str = "amanote_params";

/// Inline script defining the page-global parameters. The payload can be
/// large, which is why it travels in the footer and not as an init argument.
pub fn render_footer_script(params: &ParameterModel) -> Result<String> {
    let json = serde_json::to_string(params)?;
    Ok(format!(
        "<script>\n    var {} = {};\n</script>",
        PARAMS_GLOBAL,
        escape_script_json(&json)
    ))
}

/// Keeps a `</script>` inside a string value from closing the inline script.
fn escape_script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

pub fn render_injection(params: &ParameterModel, user: &UserParameterModel) -> Result<Injection> {
    Ok(Injection {
        footer_html: render_footer_script(params)?,
        amd: AmdCall {
            module: AMD_MODULE.to_string(),
            function: AMD_FUNCTION.to_string(),
            args: vec![serde_json::to_string(user)?],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::params::{HostInfo, PluginConfig};

    fn params(name: &str) -> ParameterModel {
        ParameterModel {
            site_url: "https://lms.test".to_string(),
            language: "en".to_string(),
            private_file_path: "/21/user/private/Amanote/".to_string(),
            files: Vec::new(),
            moodle: HostInfo {
                version: "4.1.2".to_string(),
            },
            plugin: PluginConfig {
                version: "2020101900".to_string(),
                autosave_period: 5,
                save_in_provider: false,
                key: None,
                logo: "https://lms.test/logo.png".to_string(),
            },
            strings: crate::lang::strings_for(name),
            listener_delay_ms: 500,
        }
    }

    #[test]
    fn footer_defines_global() {
        let html = render_footer_script(&params("en")).unwrap();

        assert!(html.starts_with("<script>\n    var amanote_params = {"));
        assert!(html.ends_with("};\n</script>"));
        assert!(html.contains(r#""siteURL":"https://lms.test""#));

        let json = html
            .trim_start_matches("<script>\n    var amanote_params = ")
            .trim_end_matches(";\n</script>");
        assert_eq!(ParameterModel::from_json(json).unwrap(), params("en"));
    }

    #[test]
    fn closing_tags_are_escaped() {
        let mut p = params("en");
        p.strings.teacher = "</script><script>alert(1)</script>".to_string();

        let html = render_footer_script(&p).unwrap();
        assert_eq!(html.matches("</script>").count(), 1);
    }

    #[test]
    fn injection_carries_user_params_as_single_argument() {
        let user = UserParameterModel {
            id: "3".to_string(),
            token: None,
            is_teacher: true,
        };

        let injection = render_injection(&params("en"), &user).unwrap();

        assert_eq!(injection.amd.module, "filter_amanote/main");
        assert_eq!(injection.amd.function, "init");
        assert_eq!(injection.amd.args.len(), 1);
        assert_eq!(UserParameterModel::parse(&injection.amd.args[0]).unwrap(), user);
    }
}
