impl<IN, OUT, ST> PendantApp<IN, OUT, ST>
where
    IN: InputSource,
    OUT: CommandSink,
    ST: SettingsStore,
{
    pub fn new(input: IN, commands: OUT, settings: ST, config: PendantConfig) -> Self {
        Self {
            input,
            commands,
            settings,
            config,
            telemetry: Telemetry::new(),
            selection: Selection::new(),
            nav: Navigation::new(),
            cache: RegionCache::new(config.cache_headroom_bytes),
            orientation: Orientation::default(),
            buttons: [DebounceTracker::new(config.button_debounce_ms); Button::COUNT],
            encoder: EncoderTracker::new(),
            jog_limiter: RateLimiter::new(config.jog_debounce_ms),
            orientation_limiter: RateLimiter::new(config.orientation_debounce_ms),
            touch_limiter: RateLimiter::new(config.touch_interval_ms),
            last_refresh_ms: 0,
            input_fault: false,
        }
    }

    /// Applies the persisted orientation and paints the main menu.
    pub fn start<S: Surface>(&mut self, surface: &mut S, now_ms: u64) {
        self.orientation = settings::load_orientation(&mut self.settings);
        info!("ui: start orientation={:?}", self.orientation);
        if surface.set_orientation(self.orientation).is_err() {
            warn!("display: orientation {:?} not applied", self.orientation);
        }

        self.full_repaint(surface);
        self.last_refresh_ms = now_ms;
    }

    pub fn current_screen(&self) -> Screen {
        self.nav.current
    }

    pub fn previous_screen(&self) -> Screen {
        self.nav.previous
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Writable telemetry for the controller poller; shown on the next refresh.
    pub fn telemetry_mut(&mut self) -> &mut Telemetry {
        &mut self.telemetry
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn cache(&self) -> &RegionCache {
        &self.cache
    }

    pub fn commands(&self) -> &OUT {
        &self.commands
    }

    pub fn config(&self) -> &PendantConfig {
        &self.config
    }

    /// Hands back the owned collaborators.
    pub fn release(self) -> (IN, OUT, ST) {
        (self.input, self.commands, self.settings)
    }

    /// Switches screens and repaints everything.
    pub fn navigate<S: Surface>(&mut self, screen: Screen, surface: &mut S) {
        debug!("ui-nav: {:?} -> {:?}", self.nav.current, screen);
        self.nav.go(screen);
        if screen == Screen::SdCard {
            self.selection.sd.clamp(self.telemetry.sd_files.len());
        }
        self.full_repaint(surface);
    }

    /// Static chrome first, then the cache binding, then every region.
    fn full_repaint<S: Surface>(&mut self, surface: &mut S) {
        let screen = self.nav.current;
        if ui::paint_static(screen.layout(), surface).is_err() {
            warn!("display: static paint failed for {:?}", screen);
        }

        self.cache.bind(screen, surface);
        self.refresh_regions(surface);
    }

    fn refresh_regions<S: Surface>(&mut self, surface: &mut S) {
        for spec in self.nav.current.layout().regions {
            self.update_region(spec.id, surface);
        }
    }

    fn update_region<S: Surface>(&mut self, region: RegionId, surface: &mut S) {
        let view = View {
            telemetry: &self.telemetry,
            selection: &self.selection,
            orientation: self.orientation,
        };
        if self.cache.update(region, surface, &view).is_err() {
            warn!("display: region {:?} update failed", region);
        }
    }
}
