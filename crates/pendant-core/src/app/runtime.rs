impl<IN, OUT, ST> PendantApp<IN, OUT, ST>
where
    IN: InputSource,
    OUT: CommandSink,
    ST: SettingsStore,
{
    /// One pass of the main loop: buttons, encoder, periodic refresh, then a
    /// single touch sample.
    pub fn tick<S, D>(&mut self, now_ms: u64, surface: &mut S, delay: &mut D) -> TickResult
    where
        S: Surface,
        D: DelayNs,
    {
        let mut rendered = false;

        match self.input.sample() {
            Ok(levels) => {
                self.input_fault = false;
                self.service_buttons(levels, now_ms);
                rendered |= self.service_encoder(levels, now_ms, surface);
            }
            Err(_) => {
                if !self.input_fault {
                    warn!("input: sample failed; buttons and dial ignored");
                }
                self.input_fault = true;
            }
        }

        if now_ms.saturating_sub(self.last_refresh_ms) >= self.config.refresh_interval_ms {
            self.last_refresh_ms = now_ms;
            self.refresh_regions(surface);
            rendered = true;
        }

        rendered |= self.service_touch(now_ms, surface, delay);

        if rendered {
            TickResult::Rendered
        } else {
            TickResult::NoRender
        }
    }

    fn emit(&mut self, command: Command<'_>) {
        match command.to_line(&self.config.motion) {
            Some(line) => self.send(&line),
            None => warn!("cmd: {:?} does not fit a line", command),
        }
    }

    /// Fire-and-forget; a failed write is logged and dropped.
    fn send(&mut self, line: &CommandLine) {
        info!("cmd: {}", line.trim_end());
        if self.commands.send_line(line).is_err() {
            warn!("cmd: link rejected {}", line.trim_end());
        }
    }
}
