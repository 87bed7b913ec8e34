use std::fs;
use std::path::Path;

use handlebars::Handlebars;
use serde_json::json;
use tracing::debug;

use crate::config::UiConfig;
use crate::error::Error;

/// name of the built-in page
const DEFAULT_TEMPLATE: &str = "index";

/// Renders the HTML page embedding the document viewer.
///
/// Templates are resolved at construction: the built-in page is always
/// registered, a template directory adds overrides by relative name, and a
/// configured theme must name a registered `themes/<theme>/index` template.
#[derive(Debug)]
pub struct UiRenderer {
    registry: Handlebars<'static>,
    template: String,
    rest_url: String,
}

impl UiRenderer {
    pub fn new(config: &UiConfig) -> Result<UiRenderer, Error> {
        let mut registry = Handlebars::new();
        registry.register_template_string(DEFAULT_TEMPLATE, include_str!("../templates/index.hbs"))?;
        if let Some(dir) = &config.template_dir {
            register_templates(&mut registry, dir, dir)?;
        }
        let template = match &config.theme {
            Some(theme) => {
                let name = format!("themes/{theme}/index");
                if !registry.has_template(&name) {
                    return Err(Error::Render(format!("template {name} is not registered")));
                }
                name
            }
            None => DEFAULT_TEMPLATE.to_string(),
        };
        Ok(UiRenderer {
            registry,
            template,
            rest_url: config.rest_url.clone(),
        })
    }

    pub fn render(&self) -> Result<String, Error> {
        debug!("rendering UI page with template {}", self.template);
        Ok(self
            .registry
            .render(&self.template, &json!({ "rest_url": self.rest_url }))?)
    }
}

/// register every .hbs file under dir, named by its extension-less relative path
fn register_templates(
    registry: &mut Handlebars<'static>,
    root: &Path,
    dir: &Path,
) -> Result<(), Error> {
    let entries =
        fs::read_dir(dir).map_err(|err| Error::Render(format!("{}: {err}", dir.display())))?;
    for entry in entries {
        let entry = entry.map_err(|err| Error::Render(format!("{}: {err}", dir.display())))?;
        let path = entry.path();
        if path.is_dir() {
            register_templates(registry, root, &path)?;
        } else if path.extension().is_some_and(|ext| ext == "hbs") {
            let name = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .with_extension("")
                .to_string_lossy()
                .replace('\\', "/");
            let content = fs::read_to_string(&path)
                .map_err(|err| Error::Render(format!("{}: {err}", path.display())))?;
            registry.register_template_string(&name, content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs::{create_dir_all, File};
    use std::io::Write;

    #[test]
    fn default_page_embeds_the_rest_url() {
        let renderer = UiRenderer::new(&UiConfig::default()).unwrap();
        let page = renderer.render().unwrap();
        assert!(page.contains("/openapi.json"));
        assert!(page.contains("swagger-ui"));
    }

    #[test]
    fn theme_selects_a_template_from_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let theme_dir = dir.path().join("themes/dark");
        create_dir_all(&theme_dir).unwrap();
        let mut file = File::create(theme_dir.join("index.hbs")).unwrap();
        file.write_all(b"<html>dark theme at {{rest_url}}</html>")
            .unwrap();

        let config = UiConfig {
            rest_url: "/v1/openapi.json".to_string(),
            template_dir: Some(dir.path().to_path_buf()),
            theme: Some("dark".to_string()),
        };
        let page = UiRenderer::new(&config).unwrap().render().unwrap();
        assert_eq!(page, "<html>dark theme at /v1/openapi.json</html>");
    }

    #[test]
    fn unknown_theme_is_a_render_error() {
        let config = UiConfig {
            theme: Some("missing".to_string()),
            ..Default::default()
        };
        let err = UiRenderer::new(&config).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }
}
