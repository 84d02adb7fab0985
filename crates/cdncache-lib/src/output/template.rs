use crate::config::{Block, CdnConfig};
use crate::error::CdnCacheError;
use std::path::Path;

pub const TEMPLATE_SEPARATOR: char = '@';

/// Splits a `replaceTemplate` into the text before and after its separator.
fn split_template<'a>(block: &'a Block) -> Result<(&'a str, &'a str), CdnCacheError> {
    let template = block
        .replace_template
        .as_deref()
        .ok_or_else(|| CdnCacheError::InvalidTemplate {
            block: block.name.clone(),
            details: "replaceTemplate is not set".to_string(),
        })?;

    match template.split_once(TEMPLATE_SEPARATOR) {
        Some((prefix, suffix)) if !suffix.contains(TEMPLATE_SEPARATOR) => Ok((prefix, suffix)),
        _ => Err(CdnCacheError::InvalidTemplate {
            block: block.name.clone(),
            details: format!(
                "replaceTemplate must contain exactly one '{}' separator: {}",
                TEMPLATE_SEPARATOR, template
            ),
        }),
    }
}

/// One `prefix + url + suffix` line per dependency, in declared order.
pub fn render_block(block: &Block) -> Result<String, CdnCacheError> {
    let (prefix, suffix) = split_template(block)?;

    Ok(block
        .dependencies
        .iter()
        .map(|dependency| format!("{}{}{}", prefix, dependency.url, suffix))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Substitutes each block's `replaceString` in `document` with its rendered
/// references. Blocks are applied in order against the accumulating document.
pub fn rewrite_document(document: &str, config: &CdnConfig) -> Result<String, CdnCacheError> {
    let mut document = document.to_string();

    for block in &config.blocks {
        let replace_string =
            block
                .replace_string
                .as_deref()
                .ok_or_else(|| CdnCacheError::InvalidTemplate {
                    block: block.name.clone(),
                    details: "replaceString is not set".to_string(),
                })?;
        if replace_string.is_empty() {
            return Err(CdnCacheError::InvalidTemplate {
                block: block.name.clone(),
                details: "replaceString must not be empty".to_string(),
            });
        }

        let rendered = render_block(block)?;
        if !document.contains(replace_string) {
            tracing::warn!(block = %block.name, "Placeholder {} not found in template", replace_string);
        }
        document = document.replace(replace_string, &rendered);
    }

    Ok(document)
}

/// Reads `source_path`, rewrites it and writes the result to
/// `destination_path`, creating the destination's parent directory.
pub async fn rewrite_template_file(
    config: &CdnConfig,
    source_path: &Path,
    destination_path: &Path,
) -> Result<(), CdnCacheError> {
    tracing::info!("Reading template from {}", source_path.display());
    let document = tokio::fs::read_to_string(source_path)
        .await
        .map_err(|e| CdnCacheError::TemplateIo {
            path: source_path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let rewritten = rewrite_document(&document, config)?;

    if let Some(parent) = destination_path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CdnCacheError::TemplateIo {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
    }

    tokio::fs::write(destination_path, rewritten)
        .await
        .map_err(|e| CdnCacheError::TemplateIo {
            path: destination_path.to_path_buf(),
            reason: e.to_string(),
        })?;

    tracing::info!("Template written to {}", destination_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dependency;

    fn block(name: &str, token: &str, template: &str, urls: &[&str]) -> Block {
        Block {
            name: name.to_string(),
            download_directory: name.into(),
            dependencies: urls
                .iter()
                .map(|url| Dependency {
                    url: url.to_string(),
                    filename: crate::config::filename_from_url(url).to_string(),
                })
                .collect(),
            replace_string: Some(token.to_string()),
            replace_template: Some(template.to_string()),
        }
    }

    #[test]
    fn test_rewrite_document_renders_script_tags_in_order() {
        let config = CdnConfig {
            blocks: vec![block(
                "js",
                "<!--CDN_JS-->",
                "<script src=\"@\"></script>",
                &["https://cdn.example/a.js", "https://cdn.example/b.js"],
            )],
        };

        let rewritten =
            rewrite_document("<body>\n<!--CDN_JS-->\n</body>", &config).unwrap();

        assert_eq!(
            rewritten,
            "<body>\n<script src=\"https://cdn.example/a.js\"></script>\n\
             <script src=\"https://cdn.example/b.js\"></script>\n</body>"
        );
    }

    #[test]
    fn test_rewrite_document_applies_every_block() {
        let config = CdnConfig {
            blocks: vec![
                block(
                    "css",
                    "<!--CDN_CSS-->",
                    "<link rel=\"stylesheet\" href=\"@\">",
                    &["https://cdn.example/site.css"],
                ),
                block(
                    "js",
                    "<!--CDN_JS-->",
                    "<script src=\"@\"></script>",
                    &["https://cdn.example/a.js"],
                ),
            ],
        };

        let rewritten = rewrite_document("<!--CDN_CSS-->|<!--CDN_JS-->", &config).unwrap();

        assert_eq!(
            rewritten,
            "<link rel=\"stylesheet\" href=\"https://cdn.example/site.css\">|\
             <script src=\"https://cdn.example/a.js\"></script>"
        );
    }

    #[test]
    fn test_render_block_rejects_bad_separator_count() {
        let none = block("js", "x", "<script></script>", &["https://a/a.js"]);
        let two = block("js", "x", "@<script src=\"@\">", &["https://a/a.js"]);

        assert!(matches!(
            render_block(&none),
            Err(CdnCacheError::InvalidTemplate { .. })
        ));
        assert!(matches!(
            render_block(&two),
            Err(CdnCacheError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_rewrite_document_requires_replace_string() {
        let mut missing = block("js", "x", "@", &[]);
        missing.replace_string = None;

        assert!(matches!(
            rewrite_document("x", &CdnConfig { blocks: vec![missing] }),
            Err(CdnCacheError::InvalidTemplate { .. })
        ));
    }

    #[tokio::test]
    async fn test_rewrite_template_file_creates_destination_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("index.html");
        let destination = dir.path().join("dist/nested/index.html");
        std::fs::write(&source, "<head><!--CDN_JS--></head>").unwrap();
        let config = CdnConfig {
            blocks: vec![block(
                "js",
                "<!--CDN_JS-->",
                "<script src=\"@\"></script>",
                &["https://cdn.example/a.js"],
            )],
        };

        rewrite_template_file(&config, &source, &destination)
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&destination).unwrap(),
            "<head><script src=\"https://cdn.example/a.js\"></script></head>"
        );
    }

    #[tokio::test]
    async fn test_rewrite_template_file_missing_source() {
        let dir = tempfile::tempdir().unwrap();

        let result = rewrite_template_file(
            &CdnConfig::default(),
            &dir.path().join("missing.html"),
            &dir.path().join("out.html"),
        )
        .await;

        assert!(matches!(result, Err(CdnCacheError::TemplateIo { .. })));
    }
}
