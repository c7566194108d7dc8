//! Animation engine.
//!
//! - [`add_animation`] validates a definition against a spritesheet and
//!   registers it in the stopped state
//! - [`play`] starts (or restarts) a recurring timer for one animation
//! - [`update`] advances the sprite clock and runs every due tick
//! - [`stop`] / [`stop_all`] cancel timers and close playback records
//! - [`set_frame`] shows a single frame without animating
//!
//! # Tick
//!
//! Each tick reads the frame under the animation's cursor and resolves the
//! sheet again. If the frame is no longer available (the sheet was removed or
//! replaced by a smaller one) the animation logs an error and stops itself;
//! other animations are unaffected. Otherwise the cell's background is written
//! to the element, `current_frame` is updated and the cursor advances. Past
//! the last frame the cursor wraps to 0 when looping, or the animation stops
//! and its end callbacks are notified.

use log::Level;

use crate::components::animation::{AnimationDef, AnimationName, SpriteAnimation};
use crate::components::sprite::{ActiveInterval, CallbackId, CallbackPolicy, CallbackResult, Sprite};
use crate::error::{Result, SpriteError};
use crate::resources::element::DisplayElement;
use crate::systems::sheets::resolve_sheet_id;

/// Why an animation left the playing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopCause {
    /// Caller asked for it.
    Explicit,
    /// A non-looping run showed its last frame.
    Completed,
    /// A tick could not resolve its frame.
    Failed,
    /// `play` on an animation that was already playing.
    Restart,
    /// Removal or destruction.
    Teardown,
}

/// Register an animation.
///
/// Frames come from `def.frames` when given, otherwise from
/// `def.start..=def.end`. Every frame must exist on the targeted sheet
/// (`def.spritesheet`, else the current sheet).
pub fn add_animation<E: DisplayElement>(sprite: &mut Sprite<E>, def: AnimationDef) -> Result<()> {
    match validate(sprite, def) {
        Ok(animation) => {
            sprite.log(
                Level::Debug,
                format!(
                    "added animation '{}' ({} frames, {}ms per frame)",
                    animation.name,
                    animation.frames.len(),
                    animation.speed
                ),
            );
            sprite.animations.push(animation);
            Ok(())
        }
        Err(err) => {
            sprite.log(Level::Error, err.to_string());
            Err(err)
        }
    }
}

fn validate<E: DisplayElement>(sprite: &Sprite<E>, def: AnimationDef) -> Result<SpriteAnimation> {
    if sprite.animation_index(&def.name).is_some() {
        return Err(SpriteError::DuplicateAnimation(def.name));
    }
    if def.speed == 0 {
        return Err(SpriteError::InvalidSpeed(def.name));
    }

    match (&def.frames, def.end) {
        (Some(frames), _) if frames.is_empty() => {
            return Err(SpriteError::MissingFrames(def.name));
        }
        (None, Some(end)) if def.start > end => {
            return Err(SpriteError::InvalidFrameRange {
                name: def.name,
                start: def.start,
                end,
            });
        }
        (None, None) => return Err(SpriteError::MissingFrames(def.name)),
        _ => {}
    }

    let sheet_id = resolve_sheet_id(sprite, def.spritesheet.as_deref(), false)?;
    let frame_count = sprite.spritesheets[&sheet_id].frame_count();
    let in_range = |frame: i64| {
        usize::try_from(frame)
            .ok()
            .filter(|&f| f < frame_count)
            .ok_or(SpriteError::FrameOutOfRange { frame, frame_count })
    };

    // Both ends of a range are checked before it is expanded
    let (frames, end) = match &def.frames {
        Some(list) => {
            let frames = list
                .iter()
                .map(|&frame| in_range(frame))
                .collect::<Result<Vec<usize>>>()?;
            let end = def.end.or_else(|| list.last().copied()).unwrap_or(def.start);
            (frames, end)
        }
        None => {
            let end = def.end.unwrap_or(def.start);
            let first = in_range(def.start)?;
            let last = in_range(end).map_err(|_| SpriteError::FrameOutOfRange {
                frame: def
                    .start
                    .max(i64::try_from(frame_count).unwrap_or(i64::MAX)),
                frame_count,
            })?;
            ((first..=last).collect(), end)
        }
    };

    Ok(SpriteAnimation {
        name: def.name,
        start: def.start,
        end,
        frames,
        speed: def.speed,
        stopped: true,
        looped: def.looped,
        spritesheet: def.spritesheet,
    })
}

/// Remove an animation, stopping it first. Its end callbacks are dropped
/// without being notified.
pub fn remove_animation<E: DisplayElement>(
    sprite: &mut Sprite<E>,
    name: impl Into<AnimationName>,
) -> Result<SpriteAnimation> {
    let name = name.into();
    let Some(index) = sprite.animation_index(&name) else {
        return Err(SpriteError::UnknownAnimation(name));
    };
    halt(sprite, &name, StopCause::Teardown);
    sprite.animation_callbacks.remove(&name);
    sprite.log(Level::Debug, format!("removed animation '{name}'"));
    Ok(sprite.animations.remove(index))
}

pub fn get_animation<'s, E: DisplayElement>(
    sprite: &'s Sprite<E>,
    name: impl Into<AnimationName>,
) -> Option<&'s SpriteAnimation> {
    let name = name.into();
    sprite.animations.iter().find(|a| a.name == name)
}

pub fn is_playing<E: DisplayElement>(sprite: &Sprite<E>, name: impl Into<AnimationName>) -> bool {
    sprite.active_intervals.contains_key(&name.into())
}

/// Names of the animations currently playing, in registration order.
pub fn playing<E: DisplayElement>(sprite: &Sprite<E>) -> Vec<AnimationName> {
    sprite
        .animations
        .iter()
        .filter(|a| sprite.active_intervals.contains_key(&a.name))
        .map(|a| a.name.clone())
        .collect()
}

/// Start playing an animation from its first frame.
///
/// `loop_override` replaces the animation's own loop flag for this run.
/// Playing an animation that is already playing restarts it.
pub fn play<E: DisplayElement>(
    sprite: &mut Sprite<E>,
    name: impl Into<AnimationName>,
    loop_override: Option<bool>,
) -> Result<()> {
    let name = name.into();
    let Some(index) = sprite.animation_index(&name) else {
        let err = SpriteError::UnknownAnimation(name);
        sprite.log(Level::Error, err.to_string());
        return Err(err);
    };
    if let Err(err) = resolve_sheet_id(sprite, sprite.animations[index].spritesheet.as_deref(), true)
    {
        sprite.log(
            Level::Error,
            format!("cannot play animation '{name}': {err}"),
        );
        return Err(err);
    }

    halt(sprite, &name, StopCause::Restart);

    let animation = &mut sprite.animations[index];
    let looped = loop_override.unwrap_or(animation.looped);
    let speed = animation.speed;
    animation.stopped = false;

    let now = sprite.timers.now();
    sprite.memory.record_start(name.clone(), now, looped);
    let handle = sprite.timers.schedule(speed, name.clone());
    sprite.active_intervals.insert(
        name.clone(),
        ActiveInterval {
            handle,
            cursor: 0,
            looped,
        },
    );
    sprite.log(
        Level::Debug,
        format!("playing animation '{name}' every {speed}ms (loop: {looped})"),
    );
    sprite.last_played_animation = Some(name);
    Ok(())
}

/// Stop one animation. Returns false when it was not playing.
pub fn stop<E: DisplayElement>(sprite: &mut Sprite<E>, name: impl Into<AnimationName>) -> bool {
    halt(sprite, &name.into(), StopCause::Explicit)
}

/// Stop every playing animation. Returns how many were stopped.
pub fn stop_all<E: DisplayElement>(sprite: &mut Sprite<E>) -> usize {
    stop_every(sprite, StopCause::Explicit)
}

pub(crate) fn stop_every<E: DisplayElement>(sprite: &mut Sprite<E>, cause: StopCause) -> usize {
    let names: Vec<AnimationName> = sprite.active_intervals.keys().cloned().collect();
    names
        .iter()
        .filter(|name| halt(sprite, name, cause))
        .count()
}

/// Show one frame directly.
///
/// `sheet_id` picks the sheet; without it the current sheet is used. On
/// success the sheet also becomes current.
pub fn set_frame<E: DisplayElement>(
    sprite: &mut Sprite<E>,
    frame: i64,
    sheet_id: Option<&str>,
) -> Result<()> {
    let resolved = resolve_sheet_id(sprite, sheet_id, false).and_then(|id| {
        let sheet = &sprite.spritesheets[&id];
        let frame_count = sheet.frame_count();
        let index = usize::try_from(frame)
            .ok()
            .filter(|&f| f < frame_count)
            .ok_or(SpriteError::FrameOutOfRange { frame, frame_count })?;
        Ok((id, index, sheet.cells[index].css()))
    });
    let (id, index, background) = match resolved {
        Ok(resolved) => resolved,
        Err(err) => {
            sprite.log(Level::Error, format!("cannot set frame {frame}: {err}"));
            return Err(err);
        }
    };

    sprite.element_mut().set_style("background", &background);
    sprite.current_frame = Some(index);
    sprite.current_spritesheet_id = Some(id);
    Ok(())
}

/// Register a callback notified when `name` finishes.
///
/// Failing callbacks are logged and never affect other callbacks or the
/// animation itself.
pub fn on_animation_end<E, F>(
    sprite: &mut Sprite<E>,
    name: impl Into<AnimationName>,
    callback: F,
) -> CallbackId
where
    E: DisplayElement,
    F: FnMut() -> CallbackResult + 'static,
{
    let id = sprite.next_callback_id();
    sprite
        .animation_callbacks
        .entry(name.into())
        .or_default()
        .push((id, Box::new(callback)));
    id
}

/// Unregister an end callback. Returns false if it was not registered.
pub fn remove_animation_callback<E: DisplayElement>(
    sprite: &mut Sprite<E>,
    name: impl Into<AnimationName>,
    id: CallbackId,
) -> bool {
    let name = name.into();
    let Some(set) = sprite.animation_callbacks.get_mut(&name) else {
        return false;
    };
    let before = set.len();
    set.retain(|(cb_id, _)| *cb_id != id);
    let removed = set.len() != before;
    if set.is_empty() {
        sprite.animation_callbacks.remove(&name);
    }
    removed
}

/// Advance the sprite clock by `delta_ms` and run every tick that falls due.
pub fn update<E: DisplayElement>(sprite: &mut Sprite<E>, delta_ms: u64) {
    let until = sprite.timers.now().saturating_add(delta_ms);
    while let Some((handle, name)) = sprite.timers.poll(until) {
        let current = sprite.active_intervals.get(&name).map(|a| a.handle);
        if current == Some(handle) {
            tick(sprite, &name);
        }
    }
    sprite.timers.advance_to(until);
}

fn tick<E: DisplayElement>(sprite: &mut Sprite<E>, name: &AnimationName) {
    let Some(active) = sprite.active_intervals.get(name).copied() else {
        return;
    };
    let Some(index) = sprite.animation_index(name) else {
        halt(sprite, name, StopCause::Failed);
        return;
    };

    let animation = &sprite.animations[index];
    let frame_total = animation.frames.len();
    let Some(&frame) = animation.frames.get(active.cursor) else {
        halt(sprite, name, StopCause::Failed);
        return;
    };
    let cell = resolve_sheet_id(sprite, animation.spritesheet.as_deref(), true)
        .ok()
        .and_then(|id| sprite.spritesheets[&id].cell(frame).map(|c| c.css()));
    let Some(background) = cell else {
        sprite.log(
            Level::Error,
            format!("frame {frame} of animation '{name}' is out of range, stopping"),
        );
        halt(sprite, name, StopCause::Failed);
        return;
    };

    sprite.element_mut().set_style("background", &background);
    sprite.current_frame = Some(frame);

    let next = active.cursor + 1;
    if next < frame_total {
        set_cursor(sprite, name, next);
    } else if active.looped {
        set_cursor(sprite, name, 0);
    } else {
        halt(sprite, name, StopCause::Completed);
    }
}

fn set_cursor<E: DisplayElement>(sprite: &mut Sprite<E>, name: &AnimationName, cursor: usize) {
    if let Some(active) = sprite.active_intervals.get_mut(name) {
        active.cursor = cursor;
    }
}

/// Take an animation out of the playing state. No-op when it is not playing.
pub(crate) fn halt<E: DisplayElement>(
    sprite: &mut Sprite<E>,
    name: &AnimationName,
    cause: StopCause,
) -> bool {
    let Some(active) = sprite.active_intervals.remove(name) else {
        return false;
    };
    sprite.timers.cancel(active.handle);
    if let Some(index) = sprite.animation_index(name) {
        sprite.animations[index].stopped = true;
    }
    let now = sprite.timers.now();
    sprite.memory.record_stop(name, now);
    sprite.log(Level::Debug, format!("stopped animation '{name}' ({cause:?})"));

    let notify = match cause {
        StopCause::Completed => true,
        StopCause::Explicit | StopCause::Failed => {
            sprite.callback_policy == CallbackPolicy::AnyStop
        }
        StopCause::Restart | StopCause::Teardown => false,
    };
    if notify {
        notify_end(sprite, name);
    }
    true
}

fn notify_end<E: DisplayElement>(sprite: &mut Sprite<E>, name: &AnimationName) {
    let Some(mut callbacks) = sprite.animation_callbacks.remove(name) else {
        return;
    };
    for (_, callback) in callbacks.iter_mut() {
        if let Err(err) = callback() {
            sprite.log(
                Level::Error,
                format!("end callback for animation '{name}' failed: {err}"),
            );
        }
    }
    sprite.animation_callbacks.insert(name.clone(), callbacks);
}
