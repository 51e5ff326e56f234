impl<IN, OUT, ST> PendantApp<IN, OUT, ST>
where
    IN: InputSource,
    OUT: CommandSink,
    ST: SettingsStore,
{
    fn service_buttons(&mut self, levels: RawLevels, now_ms: u64) {
        for button in Button::ALL {
            if self.buttons[button as usize].update(levels.pressed(button), now_ms) {
                self.on_button(button);
            }
        }
    }

    /// Yellow checks the alarm state at the moment the press is confirmed.
    fn on_button(&mut self, button: Button) {
        let command = match button {
            Button::Red => Command::FeedHold,
            Button::Yellow if self.telemetry.is_alarm() => Command::ClearAlarm,
            Button::Yellow => Command::FeedHold,
            Button::Green => Command::CycleResume,
        };
        debug!("input: {:?} button", button);
        self.emit(command);
    }

    fn service_encoder<S: Surface>(&mut self, levels: RawLevels, now_ms: u64, surface: &mut S) -> bool {
        let Some(rotation) = self.encoder.update(levels.clock_high, levels.data_high) else {
            return false;
        };

        match self.nav.current {
            Screen::JogHoming => {
                if !self.jog_limiter.accept(now_ms) {
                    return false;
                }
                let command = Command::Jog {
                    axis: self.selection.axis,
                    distance_mm: rotation.sign() * self.selection.increment.distance_mm(),
                };
                self.emit(command);
                false
            }
            Screen::ConnectionInfo => {
                if !self.orientation_limiter.accept(now_ms) {
                    return false;
                }
                self.toggle_orientation(surface);
                true
            }
            _ => false,
        }
    }

    fn toggle_orientation<S: Surface>(&mut self, surface: &mut S) {
        self.orientation = self.orientation.toggled();
        info!("ui: orientation -> {:?}", self.orientation);
        if surface.set_orientation(self.orientation).is_err() {
            warn!("display: orientation {:?} not applied", self.orientation);
        }

        self.full_repaint(surface);

        if settings::save_orientation(&mut self.settings, self.orientation).is_err() {
            warn!("settings: rotation not saved; change is volatile");
        }
    }

    fn service_touch<S, D>(&mut self, now_ms: u64, surface: &mut S, delay: &mut D) -> bool
    where
        S: Surface,
        D: DelayNs,
    {
        let Some(point) = surface.touch() else {
            return false;
        };
        if !self.touch_limiter.accept(now_ms) {
            return false;
        }

        let Some(control) = self.nav.current.layout().hit_test(point) else {
            debug!("input: touch ({}, {}) missed", point.x, point.y);
            return false;
        };
        debug!(
            "input: touch ({}, {}) -> {:?}",
            point.x, point.y, control.action
        );
        self.dispatch(control, surface, delay);
        true
    }

    fn dispatch<S, D>(&mut self, control: &'static Control, surface: &mut S, delay: &mut D)
    where
        S: Surface,
        D: DelayNs,
    {
        if let Action::Goto(screen) = control.action {
            self.navigate(screen, surface);
            return;
        }

        if self.apply_selection(control.action) {
            for region in control.action.affected_regions() {
                self.update_region(*region, surface);
            }
            return;
        }

        let Some(line) = self
            .command_for(control.action)
            .and_then(|command| command.to_line(&self.config.motion))
        else {
            debug!("input: {:?} has nothing to send", control.action);
            return;
        };

        animate_press(control, surface, delay, self.config.press_animation_ms);
        self.send(&line);
    }

    /// Updates the local selection. Returns `false` for non-selection actions.
    fn apply_selection(&mut self, action: Action) -> bool {
        let file_count = self.telemetry.sd_files.len();
        match action {
            Action::SelectAxis(axis) => self.selection.axis = axis,
            Action::SelectIncrement(increment) => self.selection.increment = increment,
            Action::SelectCoordSystem(cs) => self.selection.coord_system = cs,
            Action::SelectProbe(kind) => self.selection.probe = kind,
            Action::SelectFeedOverride(preset) => self.selection.feed_override = preset,
            Action::SelectSpindleOverride(preset) => self.selection.spindle_override = preset,
            Action::SelectSpindleDirection(dir) => self.selection.spindle_direction = dir,
            Action::SelectSpindlePreset(preset) => self.selection.spindle_preset = preset,
            Action::SelectFileRow(row) => {
                self.selection.sd.clamp(file_count);
                self.selection.sd.select_row(row as usize, file_count);
            }
            Action::ScrollBack => {
                self.selection.sd.clamp(file_count);
                self.selection.sd.scroll_back();
            }
            Action::ScrollNext => {
                self.selection.sd.clamp(file_count);
                self.selection.sd.scroll_next(file_count);
            }
            _ => return false,
        }
        true
    }

    fn command_for(&self, action: Action) -> Option<Command<'_>> {
        let selection = &self.selection;
        let command = match action {
            Action::HomeAxis(axis) => Command::Home(axis),
            Action::ZeroAxis(axis) => Command::ZeroAxis(selection.coord_system, axis),
            Action::ZeroAll => Command::ZeroAll(selection.coord_system),
            Action::StartProbe => Command::Probe(selection.probe),
            Action::SpindleStart => Command::SpindleStart(
                selection.spindle_direction,
                selection.spindle_preset.rpm(),
            ),
            Action::SpindleStop => Command::SpindleStop,
            Action::RunMacro(index) => Command::RunMacro(index),
            Action::OpenFile => Command::RunFile(self.selected_file()?),
            Action::DeleteFile => Command::DeleteFile(self.selected_file()?),
            _ => return None,
        };
        Some(command)
    }

    fn selected_file(&self) -> Option<&str> {
        self.telemetry.sd_file(self.selection.sd.selected())
    }
}

/// Shows the inverted button for the press window, then restores it.
fn animate_press<S, D>(control: &Control, surface: &mut S, delay: &mut D, press_ms: u32)
where
    S: Surface,
    D: DelayNs,
{
    if ui::draw_button(surface, control, ButtonLook::Pressed).is_err() {
        warn!("display: press feedback failed");
        return;
    }
    delay.delay_ms(press_ms);
    if ui::draw_button(surface, control, ButtonLook::Normal).is_err() {
        warn!("display: button restore failed");
    }
}
