//! Spritesheet management.
//!
//! - [`add_sheet`] awaits the image, computes the grid and stores the sheet
//! - [`remove_sheet`] drops a sheet; animations bound to it keep running until
//!   their next tick finds the frame unresolvable
//! - [`get_sheet`] resolves a sheet by id, or the current one

use log::Level;

use crate::components::sprite::Sprite;
use crate::components::spritesheet::SpriteSheet;
use crate::error::{Result, SpriteError};
use crate::resources::element::DisplayElement;
use crate::resources::imageloader::ImageLoader;
use crate::systems::grid::{SheetOptions, build_sheet};

/// Load the image behind `options.url` and add the resulting sheet.
///
/// The first sheet added to a sprite becomes its current sheet. Cell size
/// defaults to the sprite's own width and height.
pub async fn add_sheet<'s, E, L>(
    sprite: &'s mut Sprite<E>,
    loader: &L,
    options: SheetOptions,
) -> Result<&'s SpriteSheet>
where
    E: DisplayElement,
    L: ImageLoader,
{
    if sprite.spritesheets.contains_key(&options.id) {
        let err = SpriteError::DuplicateSheet(options.id);
        sprite.log(Level::Error, err.to_string());
        return Err(err);
    }

    let image = match loader.load(&options.url).await {
        Ok(image) => image,
        Err(err) => {
            sprite.log(Level::Error, err.to_string());
            return Err(err);
        }
    };

    let sheet = match build_sheet(image, &options, (sprite.width, sprite.height)) {
        Ok(sheet) => sheet,
        Err(err) => {
            sprite.log(
                Level::Error,
                format!("cannot slice '{}' into a grid: {err}", options.url),
            );
            return Err(err);
        }
    };

    sprite.log(
        Level::Debug,
        format!(
            "added spritesheet '{}' ({}x{} cells of {}x{}px)",
            sheet.id, sheet.columns, sheet.rows, sheet.width, sheet.height
        ),
    );
    if sprite.current_spritesheet_id.is_none() {
        sprite.current_spritesheet_id = Some(sheet.id.clone());
    }
    let id = sheet.id.clone();
    Ok(sprite.spritesheets.entry(id).or_insert(sheet))
}

/// Remove a sheet. Returns false if no sheet had that id.
pub fn remove_sheet<E: DisplayElement>(sprite: &mut Sprite<E>, id: &str) -> bool {
    if sprite.spritesheets.remove(id).is_none() {
        return false;
    }
    if sprite.current_spritesheet_id.as_deref() == Some(id) {
        sprite.current_spritesheet_id = sprite.spritesheets.keys().next().cloned();
    }
    sprite.log(Level::Debug, format!("removed spritesheet '{id}'"));
    true
}

/// With an id, that sheet; without, the current sheet or else any remaining
/// one.
pub fn get_sheet<'s, E: DisplayElement>(
    sprite: &'s Sprite<E>,
    id: Option<&str>,
) -> Option<&'s SpriteSheet> {
    let id = resolve_sheet_id(sprite, id, true).ok()?;
    sprite.spritesheets.get(&id)
}

/// Ids of all loaded sheets, sorted.
pub fn sheet_ids<E: DisplayElement>(sprite: &Sprite<E>) -> Vec<String> {
    let mut ids: Vec<String> = sprite.spritesheets.keys().cloned().collect();
    ids.sort();
    ids
}

/// Resolve which sheet an operation targets.
///
/// An explicit id must exist. Without one the current sheet is used, and
/// when `any_fallback` is set, any loaded sheet after that.
pub(crate) fn resolve_sheet_id<E: DisplayElement>(
    sprite: &Sprite<E>,
    explicit: Option<&str>,
    any_fallback: bool,
) -> Result<String> {
    if let Some(id) = explicit {
        return if sprite.spritesheets.contains_key(id) {
            Ok(id.to_string())
        } else {
            Err(SpriteError::UnknownSheet(id.to_string()))
        };
    }
    if let Some(current) = sprite
        .current_spritesheet_id
        .as_ref()
        .filter(|id| sprite.spritesheets.contains_key(*id))
    {
        return Ok(current.clone());
    }
    if any_fallback {
        if let Some(id) = sprite.spritesheets.keys().next() {
            return Ok(id.clone());
        }
    }
    Err(SpriteError::NoSheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::sprite::SpriteOptions;
    use crate::resources::element::VirtualDocument;
    use crate::resources::imageloader::MemoryImageLoader;
    use crate::systems::lifecycle::create_sprite;

    fn sprite() -> Sprite {
        create_sprite(&mut VirtualDocument::new(), SpriteOptions::new("hero", 32, 32)).unwrap()
    }

    fn loader() -> MemoryImageLoader {
        MemoryImageLoader::new()
            .with_image("a.png", 128, 64)
            .with_image("b.png", 64, 32)
            .with_image("tiny.png", 8, 8)
    }

    #[test]
    fn test_first_sheet_becomes_current() {
        let mut sprite = sprite();
        let loader = loader();
        pollster::block_on(add_sheet(&mut sprite, &loader, SheetOptions::new("a", "a.png")))
            .unwrap();
        pollster::block_on(add_sheet(&mut sprite, &loader, SheetOptions::new("b", "b.png")))
            .unwrap();
        assert_eq!(sprite.current_spritesheet_id(), Some("a"));
        assert_eq!(sheet_ids(&sprite), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut sprite = sprite();
        let loader = loader();
        pollster::block_on(add_sheet(&mut sprite, &loader, SheetOptions::new("a", "a.png")))
            .unwrap();
        let result =
            pollster::block_on(add_sheet(&mut sprite, &loader, SheetOptions::new("a", "b.png")));
        assert_eq!(result.unwrap_err(), SpriteError::DuplicateSheet("a".into()));
        assert_eq!(get_sheet(&sprite, Some("a")).unwrap().url, "a.png");
    }

    #[test]
    fn test_load_failure_adds_nothing() {
        let mut sprite = sprite();
        let result = pollster::block_on(add_sheet(
            &mut sprite,
            &loader(),
            SheetOptions::new("x", "missing.png"),
        ));
        assert!(matches!(result, Err(SpriteError::ImageLoad { .. })));
        assert!(sprite.spritesheets().is_empty());
        assert!(sprite.current_spritesheet_id().is_none());
    }

    #[test]
    fn test_image_smaller_than_cell_adds_nothing() {
        let mut sprite = sprite();
        let result = pollster::block_on(add_sheet(
            &mut sprite,
            &loader(),
            SheetOptions::new("t", "tiny.png"),
        ));
        assert!(matches!(result, Err(SpriteError::EmptyGrid { .. })));
        assert!(sprite.spritesheets().is_empty());
    }

    #[test]
    fn test_remove_current_falls_back() {
        let mut sprite = sprite();
        let loader = loader();
        pollster::block_on(add_sheet(&mut sprite, &loader, SheetOptions::new("a", "a.png")))
            .unwrap();
        pollster::block_on(add_sheet(&mut sprite, &loader, SheetOptions::new("b", "b.png")))
            .unwrap();

        assert!(remove_sheet(&mut sprite, "a"));
        assert_eq!(sprite.current_spritesheet_id(), Some("b"));
        assert!(!remove_sheet(&mut sprite, "a"));

        assert!(remove_sheet(&mut sprite, "b"));
        assert!(sprite.current_spritesheet_id().is_none());
        assert!(get_sheet(&sprite, None).is_none());
    }

    #[test]
    fn test_get_sheet_explicit_id_does_not_fall_back() {
        let mut sprite = sprite();
        pollster::block_on(add_sheet(&mut sprite, &loader(), SheetOptions::new("a", "a.png")))
            .unwrap();
        assert!(get_sheet(&sprite, Some("nope")).is_none());
        assert_eq!(get_sheet(&sprite, None).unwrap().id, "a");
    }
}
