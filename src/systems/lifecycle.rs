//! Sprite lifecycle and element plumbing.

use log::Level;

use crate::components::memory::Memory;
use crate::components::sprite::{Sprite, SpriteOptions};
use crate::error::{Result, SpriteError};
use crate::resources::element::{DisplayElement, Document, NodeKind};
use crate::resources::logger;
use crate::systems::animation::{StopCause, stop_every};

/// CSS class given to every sprite element.
pub const SPRITE_CLASS: &str = "sprite";

/// Validate `options` and build a sprite with a fresh element from
/// `document`.
///
/// The element gets the sprite name as id, absolute positioning and the
/// sprite's pixel size, and is not draggable.
pub fn create_sprite<D: Document>(
    document: &mut D,
    options: SpriteOptions,
) -> Result<Sprite<D::Element>> {
    let log = logger::for_help_flag(options.help);
    let name = options.name.as_str();

    if name.is_empty() {
        log.log(Level::Error, name, &SpriteError::InvalidName.to_string());
        return Err(SpriteError::InvalidName);
    }
    if options.width == 0 || options.height == 0 {
        let err = SpriteError::InvalidDimensions {
            width: options.width,
            height: options.height,
        };
        log.log(Level::Error, name, &err.to_string());
        return Err(err);
    }

    let mut element = match document.create_element("div") {
        Ok(element) if element.kind() == NodeKind::Element => element,
        Ok(_) => {
            let err = SpriteError::NotAnElement(name.to_string());
            log.log(Level::Error, name, &err.to_string());
            return Err(err);
        }
        Err(err) => {
            log.log(Level::Error, name, &err.to_string());
            return Err(err);
        }
    };
    element.set_id(name);
    element.set_class_name(SPRITE_CLASS);
    element.set_style("position", "absolute");
    element.set_style("width", &format!("{}px", options.width));
    element.set_style("height", &format!("{}px", options.height));
    element.set_draggable(false);

    log.log(
        Level::Debug,
        name,
        &format!("created {}x{} sprite", options.width, options.height),
    );
    Ok(Sprite::from_parts(options, element))
}

/// Append the sprite's element to `parent`. Both must be element nodes.
pub fn attach<E: DisplayElement>(sprite: &mut Sprite<E>, parent: &mut E) -> Result<()> {
    if parent.kind() != NodeKind::Element {
        let err = SpriteError::NotAnElement(parent.id().to_string());
        sprite.log(Level::Error, format!("cannot attach: {err}"));
        return Err(err);
    }
    if sprite.element.kind() != NodeKind::Element {
        let err = SpriteError::NotAnElement(sprite.name.clone());
        sprite.log(Level::Error, format!("cannot attach: {err}"));
        return Err(err);
    }
    parent.append_child(sprite.element_mut());
    sprite.log(Level::Debug, format!("attached to '{}'", parent.id()));
    Ok(())
}

/// Remove the sprite's element from its parent.
pub fn detach<E: DisplayElement>(sprite: &mut Sprite<E>) {
    sprite.element_mut().remove();
}

/// Tear the sprite down: stop all timers without notifying end callbacks,
/// clear every collection and remove the element.
///
/// The sprite must not be used afterwards.
pub fn destroy<E: DisplayElement>(sprite: &mut Sprite<E>) {
    stop_every(sprite, StopCause::Teardown);
    sprite.timers.clear();
    sprite.spritesheets.clear();
    sprite.animations.clear();
    sprite.active_intervals.clear();
    sprite.animation_callbacks.clear();
    sprite.memory.clear();
    sprite.current_frame = None;
    sprite.current_spritesheet_id = None;
    sprite.last_played_animation = None;
    sprite.element_mut().remove();
    sprite.log(Level::Debug, "destroyed");
}

/// Copy of the playback log.
pub fn get_memory<E: DisplayElement>(sprite: &Sprite<E>) -> Memory {
    sprite.memory.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::element::{VirtualDocument, VirtualElement};

    #[test]
    fn test_element_is_configured() {
        let sprite =
            create_sprite(&mut VirtualDocument::new(), SpriteOptions::new("hero", 48, 24)).unwrap();
        let el = sprite.element();
        assert_eq!(el.id, "hero");
        assert_eq!(el.class_name, SPRITE_CLASS);
        assert_eq!(el.style("position"), Some("absolute"));
        assert_eq!(el.style("width"), Some("48px"));
        assert_eq!(el.style("height"), Some("24px"));
        assert!(!el.draggable);
    }

    #[test]
    fn test_whitespace_name_is_still_a_name() {
        let sprite =
            create_sprite(&mut VirtualDocument::new(), SpriteOptions::new(" ", 1, 1)).unwrap();
        assert_eq!(sprite.name(), " ");
        assert_eq!(sprite.element().id(), " ");
    }

    #[test]
    fn test_attach_rejects_text_parent() {
        let mut sprite =
            create_sprite(&mut VirtualDocument::new(), SpriteOptions::new("hero", 8, 8)).unwrap();
        let mut text = VirtualElement::text();
        assert!(matches!(
            attach(&mut sprite, &mut text),
            Err(SpriteError::NotAnElement(_))
        ));
        assert!(!sprite.element().is_attached());
    }

    #[test]
    fn test_attach_then_detach() {
        let mut sprite =
            create_sprite(&mut VirtualDocument::new(), SpriteOptions::new("hero", 8, 8)).unwrap();
        let mut stage = VirtualElement::new("div");
        stage.id = "stage".into();

        attach(&mut sprite, &mut stage).unwrap();
        assert_eq!(sprite.element().parent.as_deref(), Some("stage"));
        assert_eq!(stage.children, vec!["hero".to_string()]);

        detach(&mut sprite);
        assert!(!sprite.element().is_attached());
    }
}
