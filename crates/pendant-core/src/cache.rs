//! Off-screen buffers for the frequently redrawn regions of one screen.
//!
//! The cache is bound to at most one screen. Binding allocates one sprite per
//! region when the heap has room, otherwise updates draw straight to the
//! panel through a clip. An update for a region of another screen is a no-op,
//! so a late refresh can never paint into a sprite that now belongs to a
//! different layout.

use embedded_graphics::{
    draw_target::{DrawTarget, DrawTargetExt},
    geometry::Point,
    primitives::Rectangle,
};
use heapless::Vec;
use log::{debug, warn};
use pendant_canvas::{Sprite, panel};

use crate::{
    surface::Surface,
    ui::{RegionId, RegionPainter, Screen},
};

/// Largest region count of any screen.
pub const MAX_REGIONS: usize = 4;

/// Free heap that must remain after allocating a screen's sprites.
pub const DEFAULT_HEADROOM_BYTES: usize = 16 * 1024;

#[derive(Debug)]
struct Slot {
    owner: Screen,
    region: RegionId,
    rect: Rectangle,
    sprite: Sprite,
}

#[derive(Debug)]
pub struct RegionCache {
    bound: Option<Screen>,
    slots: Vec<Slot, MAX_REGIONS>,
    headroom_bytes: usize,
}

impl Default for RegionCache {
    fn default() -> Self {
        Self::new(DEFAULT_HEADROOM_BYTES)
    }
}

impl RegionCache {
    pub const fn new(headroom_bytes: usize) -> Self {
        Self {
            bound: None,
            slots: Vec::new(),
            headroom_bytes,
        }
    }

    pub fn bound(&self) -> Option<Screen> {
        self.bound
    }

    /// True when `screen` is bound and its regions are buffered.
    pub fn is_cached(&self, screen: Screen) -> bool {
        self.bound == Some(screen) && !self.slots.is_empty()
    }

    /// Bytes held by the current sprites.
    pub fn held_bytes(&self) -> usize {
        self.slots.iter().map(|slot| slot.sprite.byte_len()).sum()
    }

    pub fn sprite(&self, region: RegionId) -> Option<&Sprite> {
        self.slots
            .iter()
            .find(|slot| slot.region == region)
            .map(|slot| &slot.sprite)
    }

    /// Drops every sprite. The owner tag is cleared first.
    pub fn release(&mut self) {
        self.bound = None;
        self.slots.clear();
    }

    /// Makes `screen` the owner, allocating its sprites when there is room.
    ///
    /// Rebinding a fully buffered owner keeps its sprites; an owner that
    /// fell back to direct drawing retries the allocation.
    pub fn bind<S: Surface>(&mut self, screen: Screen, surface: &S) {
        if self.bound == Some(screen) && self.slots.len() == screen.layout().regions.len() {
            return;
        }

        self.release();
        self.bound = Some(screen);

        let regions = screen.layout().regions;
        if regions.is_empty() {
            return;
        }

        let needed: usize = regions
            .iter()
            .map(|spec| {
                panel::buffer_bytes(spec.rect.size.width as u16, spec.rect.size.height as u16)
            })
            .sum();
        let free = surface.free_heap_bytes();
        if free < needed.saturating_add(self.headroom_bytes) {
            warn!(
                "cache: {:?} uncached; need {} + {} headroom, free {}",
                screen, needed, self.headroom_bytes, free
            );
            return;
        }

        for spec in regions {
            let sprite = match Sprite::try_new(
                spec.rect.size.width as u16,
                spec.rect.size.height as u16,
            ) {
                Ok(sprite) => sprite,
                Err(err) => {
                    warn!(
                        "cache: {:?} allocation of {} bytes failed; drawing direct",
                        spec.id, err.requested_bytes
                    );
                    self.slots.clear();
                    return;
                }
            };

            let slot = Slot {
                owner: screen,
                region: spec.id,
                rect: spec.rect,
                sprite,
            };
            if self.slots.push(slot).is_err() {
                warn!("cache: {:?} has more than {} regions", screen, MAX_REGIONS);
                self.slots.clear();
                return;
            }
        }

        debug!(
            "cache: bound {:?} with {} regions ({} bytes)",
            screen,
            self.slots.len(),
            needed
        );
    }

    /// Repaints `region` with `painter`.
    ///
    /// Cached regions are painted into their sprite and blitted in one
    /// transfer; uncached regions are cleared and painted through a clip.
    pub fn update<S, P>(
        &mut self,
        region: RegionId,
        surface: &mut S,
        painter: &P,
    ) -> Result<(), S::Error>
    where
        S: Surface,
        P: RegionPainter,
    {
        let Some(bound) = self.bound else {
            debug!("cache: {:?} update with nothing bound", region);
            return Ok(());
        };
        if region.screen() != bound {
            debug!("cache: stale {:?} update while {:?} is bound", region, bound);
            return Ok(());
        }
        let Some(spec) = region.spec() else {
            return Ok(());
        };
        let background = spec.background();

        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|slot| slot.owner == bound && slot.region == region)
        {
            let origin = slot.rect.top_left;
            let _ = slot.sprite.clear(background);
            let _ = painter.paint(region, &mut slot.sprite.translated(-origin));
            return surface.blit(&slot.sprite, origin);
        }

        let mut clipped = surface.clipped(&spec.rect);
        clipped.fill_solid(&spec.rect, background)?;
        painter.paint(region, &mut clipped)
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::{
        pixelcolor::{Rgb565, RgbColor},
        geometry::Size,
    };

    use super::*;
    use crate::{
        surface::testing::TestSurface,
        ui::{RegionSpec, theme},
    };

    const PLENTY: usize = 512 * 1024;

    /// Paints a one-pixel marker at the region's corner.
    struct Marker(Rgb565);

    impl RegionPainter for Marker {
        fn paint<D>(&self, region: RegionId, target: &mut D) -> Result<(), D::Error>
        where
            D: DrawTarget<Color = Rgb565>,
        {
            let rect = region.spec().map(|spec| spec.rect).unwrap_or(Rectangle::zero());
            target.fill_solid(&Rectangle::new(rect.top_left, Size::new(1, 1)), self.0)
        }
    }

    fn spec(region: RegionId) -> &'static RegionSpec {
        region.spec().unwrap()
    }

    fn at(surface: &TestSurface, point: Point) -> Option<Rgb565> {
        surface.frame.color_at(point.x as usize, point.y as usize)
    }

    #[test]
    fn bind_allocates_one_sprite_per_region() {
        let surface = TestSurface::new(PLENTY);
        let mut cache = RegionCache::default();

        cache.bind(Screen::JogHoming, &surface);

        assert!(cache.is_cached(Screen::JogHoming));
        for region in [
            RegionId::JogAxisDisplay,
            RegionId::JogAxisGroup,
            RegionId::JogIncrementGroup,
        ] {
            let sprite = cache.sprite(region).unwrap();
            assert_eq!(sprite.width() as u32, spec(region).rect.size.width);
        }
    }

    #[test]
    fn low_heap_falls_back_to_direct_drawing() {
        let mut surface = TestSurface::new(1024);
        let mut cache = RegionCache::default();

        cache.bind(Screen::JogHoming, &surface);
        cache
            .update(RegionId::JogAxisGroup, &mut surface, &Marker(Rgb565::RED))
            .unwrap();

        assert!(!cache.is_cached(Screen::JogHoming));
        assert_eq!(cache.bound(), Some(Screen::JogHoming));
        assert!(surface.blits.is_empty());
        let rect = spec(RegionId::JogAxisGroup).rect;
        assert_eq!(at(&surface, rect.top_left), Some(Rgb565::RED));
        assert_eq!(at(&surface, rect.top_left + Point::new(1, 0)), Some(theme::BACKGROUND));
    }

    #[test]
    fn cached_update_blits_exactly_the_region() {
        let mut surface = TestSurface::new(PLENTY);
        let mut cache = RegionCache::default();
        cache.bind(Screen::MainMenu, &surface);

        cache
            .update(RegionId::MenuState, &mut surface, &Marker(Rgb565::GREEN))
            .unwrap();

        let rect = spec(RegionId::MenuState).rect;
        assert_eq!(surface.blits, [rect]);
        assert_eq!(at(&surface, rect.top_left), Some(Rgb565::GREEN));
        assert_eq!(
            at(&surface, rect.top_left + Point::new(2, 2)),
            Some(theme::DARKER_BG)
        );
    }

    #[test]
    fn stale_update_never_touches_the_new_owner() {
        let mut surface = TestSurface::new(PLENTY);
        let mut cache = RegionCache::default();
        cache.bind(Screen::JogHoming, &surface);
        cache.bind(Screen::WorkArea, &surface);

        cache
            .update(RegionId::JogAxisDisplay, &mut surface, &Marker(Rgb565::RED))
            .unwrap();

        assert!(surface.blits.is_empty());
        assert!(cache.sprite(RegionId::JogAxisDisplay).is_none());
        let rect = spec(RegionId::JogAxisDisplay).rect;
        assert_eq!(at(&surface, rect.top_left), Some(Rgb565::BLACK));
    }

    #[test]
    fn rebinding_releases_previous_sprites() {
        let surface = TestSurface::new(PLENTY);
        let mut cache = RegionCache::default();

        cache.bind(Screen::Status, &surface);
        let status_bytes = cache.held_bytes();
        cache.bind(Screen::Macros, &surface);

        assert!(status_bytes > 0);
        assert_eq!(cache.held_bytes(), 0);
        assert!(!cache.is_cached(Screen::Macros));
        assert_eq!(cache.bound(), Some(Screen::Macros));
    }

    #[test]
    fn update_without_binding_is_ignored() {
        let mut surface = TestSurface::new(PLENTY);
        let mut cache = RegionCache::default();

        cache
            .update(RegionId::MenuState, &mut surface, &Marker(Rgb565::RED))
            .unwrap();

        assert!(surface.blits.is_empty());
        let rect = spec(RegionId::MenuState).rect;
        assert_eq!(at(&surface, rect.top_left), Some(Rgb565::BLACK));
    }
}
