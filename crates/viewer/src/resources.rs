use cfg_if::cfg_if;

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no browser window"))?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow::anyhow!("page has no origin: {:?}", e))?;
    Ok(reqwest::Url::parse(&format!("{}/", origin))?
        .join("res/")?
        .join(file_name)?)
}

/// Loads a text asset by its path under `res/`.
///
/// On the web this fetches the asset relative to the page origin. Natively
/// an existing file path is read directly, anything else is looked up in the
/// copy of `res/` made by the build script.
pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            let url = format_url(file_name)?;
            log::debug!("fetching {}", url);
            let text = reqwest::get(url)
                .await?
                .error_for_status()?
                .text()
                .await?;
        } else {
            use anyhow::Context;

            let direct = std::path::Path::new(file_name);
            let path = if direct.is_file() {
                direct.to_path_buf()
            } else {
                std::path::Path::new(env!("OUT_DIR"))
                    .join("res")
                    .join(file_name)
            };
            log::debug!("reading {}", path.display());
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
        }
    }

    Ok(text)
}
