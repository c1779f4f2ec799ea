use crate::core::{ChartRenderer, DrawOptions, UserResult};
use crate::utils::error::Result;

pub const DEFAULT_THEME: &str = "standard";
pub const DEFAULT_FOOTER: &str = "Made by @sallar & friends - github-contributions.vercel.app";

/// Draws one chart per result, in result order. Stops at the first renderer error.
pub fn render_all<R, S>(
    renderer: &R,
    results: &[UserResult],
    theme_name: &str,
    footer_text: &str,
    mut new_surface: S,
) -> Result<Vec<(String, R::Surface)>>
where
    R: ChartRenderer,
    S: FnMut(&str) -> R::Surface,
{
    let mut surfaces = Vec::with_capacity(results.len());

    for result in results {
        let mut surface = new_surface(&result.username);
        renderer.draw(
            &mut surface,
            &DrawOptions {
                username: &result.username,
                contributions: &result.data,
                theme_name,
                footer_text,
            },
        )?;
        surfaces.push((result.username.clone(), surface));
    }

    Ok(surfaces)
}
