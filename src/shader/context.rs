//! Per-draw shading contexts and the storage slot they live in.

use std::mem::size_of;

use crate::pixel::color::PmColor;

bitflags::bitflags! {
    /// Properties a context reports about the spans it produces.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ShaderFlags: u32 {
        /// Every produced colour has alpha 255.
        const OPAQUE_ALPHA = 1 << 0;
        /// `shade_span16` is supported.
        const HAS_SPAN16 = 1 << 1;
    }
}

/// Fast span routine exposed by contexts that can shade without per-call dispatch.
pub type ShadeProc<'a> = Box<dyn Fn(i32, i32, &mut [PmColor]) + 'a>;

/// Stateful producer of pixel colours for horizontal runs of one scan line.
///
/// `x`, `y` are device coordinates of the first pixel; the span length is `dst.len()`.
pub trait ShaderContext: Send {
    /// Properties of the produced spans.
    fn flags(&self) -> ShaderFlags;

    /// Optional direct span routine.
    fn shade_proc(&self) -> Option<ShadeProc<'_>> {
        None
    }

    /// Fill `dst` with premultiplied colours.
    fn shade_span(&mut self, x: i32, y: i32, dst: &mut [PmColor]);

    /// Fill `dst` with RGB565 colours.
    fn shade_span16(&mut self, x: i32, y: i32, dst: &mut [u16]) {
        let mut tmp = vec![PmColor::TRANSPARENT; dst.len()];
        self.shade_span(x, y, &mut tmp);
        for (d, c) in dst.iter_mut().zip(&tmp) {
            *d = c.to_rgb565();
        }
    }
}

/// Caller-owned slot that holds exactly one shading context.
///
/// The capacity is the byte bound reported by the shader's `context_size()`; contexts placed in
/// the slot must not be larger. The context stays alive until [`ContextStorage::release`] (or
/// drop) tears it down.
pub struct ContextStorage {
    capacity: usize,
    slot: Option<Box<dyn ShaderContext>>,
}

impl std::fmt::Debug for ContextStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextStorage")
            .field("capacity", &self.capacity)
            .field("occupied", &self.slot.is_some())
            .finish()
    }
}

impl ContextStorage {
    /// Reserve a slot for contexts of at most `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            slot: None,
        }
    }

    /// Byte bound of this slot.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether a context currently lives here.
    pub fn is_occupied(&self) -> bool {
        self.slot.is_some()
    }

    /// Construct `ctx` in the slot, tearing down any previous occupant first.
    pub(crate) fn emplace<C: ShaderContext + 'static>(&mut self, ctx: C) -> &mut dyn ShaderContext {
        debug_assert!(
            size_of::<C>() <= self.capacity,
            "context of {} bytes does not fit storage of {} bytes",
            size_of::<C>(),
            self.capacity
        );
        self.release();
        self.slot.insert(Box::new(ctx)).as_mut()
    }

    /// The live context, if any.
    pub fn get(&self) -> Option<&dyn ShaderContext> {
        self.slot.as_deref()
    }

    /// The live context, if any.
    pub fn get_mut(&mut self) -> Option<&mut dyn ShaderContext> {
        self.slot
            .as_mut()
            .map(|ctx| &mut **ctx as &mut dyn ShaderContext)
    }

    /// Destroy the live context. The slot can be reused afterwards.
    pub fn release(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shader/context.rs"]
mod tests;
