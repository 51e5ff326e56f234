#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_time::Timer;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use esp_hal::{
    clock::CpuClock,
    delay::Delay,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    spi::master::Spi,
    time::{Duration as HalDuration, Instant, Rate},
    timer::timg::TimerGroup,
    uart::Uart,
};
use log::{LevelFilter, info, warn};
use mipidsi::{
    Builder as DisplayBuilder,
    interface::SpiInterface,
    models::ILI9341Rgb565,
    options::{ColorOrder, Orientation as PanelOrientation},
};
use pendant_core::{
    app::{PendantApp, PendantConfig, TickResult},
    settings::{MemorySettings, MemorySettingsError, Orientation, SettingsStore},
    telemetry::push_truncated,
};
use pendant_hal_esp32::{
    input::panel::{PanelInputConfig, PanelInputs},
    platform::display::{CydSurface, rotation_for},
    serial::uart::UartSink,
    storage::flash_settings::{FlashSettingsError, FlashSettingsStore},
    touch::xpt2046::{Xpt2046, Xpt2046Config},
};
use static_cell::StaticCell;

const DISPLAY_SPI_HZ: u32 = 40_000_000;
const TOUCH_SPI_HZ: u32 = 2_000_000;
const SERIAL_BAUD: u32 = 115_200;
const SERIAL_PORT: &str = "UART2";
const ENCODER_DIRECTION_INVERTED: bool = false;
const HEAP_REPORT_INTERVAL_SECS: u64 = 5;

static DISPLAY_BUFFER: StaticCell<[u8; 512]> = StaticCell::new();

/// Flash when the partition is usable, RAM otherwise.
enum SettingsBackend {
    Flash(FlashSettingsStore),
    Volatile(MemorySettings),
}

#[derive(Debug)]
enum SettingsBackendError {
    Flash(FlashSettingsError),
    Volatile(MemorySettingsError),
}

impl SettingsStore for SettingsBackend {
    type Error = SettingsBackendError;

    fn open(&mut self, namespace: &str, read_only: bool) -> Result<(), Self::Error> {
        match self {
            Self::Flash(store) => store
                .open(namespace, read_only)
                .map_err(SettingsBackendError::Flash),
            Self::Volatile(store) => store
                .open(namespace, read_only)
                .map_err(SettingsBackendError::Volatile),
        }
    }

    fn get_i32(&mut self, key: &str, default: i32) -> i32 {
        match self {
            Self::Flash(store) => store.get_i32(key, default),
            Self::Volatile(store) => store.get_i32(key, default),
        }
    }

    fn set_i32(&mut self, key: &str, value: i32) -> Result<(), Self::Error> {
        match self {
            Self::Flash(store) => store
                .set_i32(key, value)
                .map_err(SettingsBackendError::Flash),
            Self::Volatile(store) => store
                .set_i32(key, value)
                .map_err(SettingsBackendError::Volatile),
        }
    }

    fn close(&mut self) {
        match self {
            Self::Flash(store) => store.close(),
            Self::Volatile(store) => store.close(),
        }
    }
}

fn free_heap() -> usize {
    esp_alloc::HEAP.free()
}

#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    esp_println::logger::init_logger(LevelFilter::Info);
    esp_println::println!("boot: pendant starting");

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Region sprites for the busiest screens need close to 90 KiB.
    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 98767);
    esp_alloc::heap_allocator!(size: 72 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // CYD wiring: SCLK=14 MOSI=13 MISO=12 CS=15 DC=2 BL=27
    let mut backlight = Output::new(peripherals.GPIO27, Level::Low, OutputConfig::default());
    let tft_cs = Output::new(peripherals.GPIO15, Level::High, OutputConfig::default());
    let tft_dc = Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default());

    let display_spi_config = esp_hal::spi::master::Config::default()
        .with_frequency(Rate::from_hz(DISPLAY_SPI_HZ))
        .with_mode(esp_hal::spi::Mode::_0);

    let display_spi = Spi::new(peripherals.SPI2, display_spi_config)
        .unwrap()
        .with_sck(peripherals.GPIO14)
        .with_mosi(peripherals.GPIO13)
        .with_miso(peripherals.GPIO12);

    let mut delay = Delay::new();

    let display_device = ExclusiveDevice::new(display_spi, tft_cs, NoDelay).unwrap();
    let display_buffer = DISPLAY_BUFFER.init([0; 512]);
    let interface = SpiInterface::new(display_device, tft_dc, display_buffer);

    esp_println::println!("display: init begin (SCLK=14 MOSI=13 CS=15 DC=2 BL=27)");
    let display = DisplayBuilder::new(ILI9341Rgb565, interface)
        .display_size(240, 320)
        .color_order(ColorOrder::Bgr)
        .orientation(PanelOrientation::new().rotate(rotation_for(Orientation::default())))
        .init(&mut delay)
        .unwrap();
    backlight.set_high();
    esp_println::println!("display: initialize ok");

    // XPT2046 on its own bus: CLK=25 MOSI=32 MISO=39 CS=33 IRQ=36
    let touch_spi_config = esp_hal::spi::master::Config::default()
        .with_frequency(Rate::from_hz(TOUCH_SPI_HZ))
        .with_mode(esp_hal::spi::Mode::_0);

    let touch_spi = Spi::new(peripherals.SPI3, touch_spi_config)
        .unwrap()
        .with_sck(peripherals.GPIO25)
        .with_mosi(peripherals.GPIO32)
        .with_miso(peripherals.GPIO39);
    let touch_cs = Output::new(peripherals.GPIO33, Level::High, OutputConfig::default());
    let touch_device = ExclusiveDevice::new(touch_spi, touch_cs, NoDelay).unwrap();
    let touch_irq = Input::new(peripherals.GPIO36, InputConfig::default());
    let touch = Xpt2046::new(touch_device, touch_irq, Xpt2046Config::default());

    let mut surface = CydSurface::new(display, touch, free_heap);

    // Buttons: RED=4 YELLOW=17 GREEN=16, encoder: CLK=22 DT=21
    let input_cfg = InputConfig::default().with_pull(Pull::Up);
    let input = PanelInputs::new(
        Input::new(peripherals.GPIO4, input_cfg),
        Input::new(peripherals.GPIO17, input_cfg),
        Input::new(peripherals.GPIO16, input_cfg),
        Input::new(peripherals.GPIO22, input_cfg),
        Input::new(peripherals.GPIO21, input_cfg),
        PanelInputConfig::default().with_direction_inverted(ENCODER_DIRECTION_INVERTED),
    );

    // UART0 stays with esp-println; the controller gets UART2 on the unused
    // SD slot lines: TX=GPIO23 RX=GPIO19
    let uart_config = esp_hal::uart::Config::default().with_baudrate(SERIAL_BAUD);
    let uart = Uart::new(peripherals.UART2, uart_config)
        .unwrap()
        .with_tx(peripherals.GPIO23)
        .with_rx(peripherals.GPIO19);
    let commands = UartSink::new(uart);

    let settings = match FlashSettingsStore::new() {
        Ok(store) => SettingsBackend::Flash(store),
        Err(err) => {
            warn!("settings storage unavailable ({:?}); defaults will be volatile", err);
            SettingsBackend::Volatile(MemorySettings::new())
        }
    };

    let pendant_config = PendantConfig::default();
    let mut app = PendantApp::new(input, commands, settings, pendant_config);

    {
        let telemetry = app.telemetry_mut();
        push_truncated(&mut telemetry.pendant_version, env!("CARGO_PKG_VERSION"));
        push_truncated(&mut telemetry.port, SERIAL_PORT);
        telemetry.baud_rate = SERIAL_BAUD;
        telemetry.free_heap_kb = (free_heap() / 1024) as u32;
    }

    info!(
        "Pendant started: touch_interval_ms={} refresh_interval_ms={} spi_hz={}",
        pendant_config.touch_interval_ms, pendant_config.refresh_interval_ms, DISPLAY_SPI_HZ
    );
    info!("Button pins: RED=GPIO4 YELLOW=GPIO17 GREEN=GPIO16");
    info!("Encoder pins: CLK=GPIO22 DT=GPIO21");
    info!("Controller link: {} TX=GPIO23 RX=GPIO19 baud={}", SERIAL_PORT, SERIAL_BAUD);

    let loop_start = Instant::now();
    app.start(&mut surface, 0);

    let mut report_start = Instant::now();
    let mut renders = 0u32;

    loop {
        let now_ms = loop_start.elapsed().as_millis();
        if app.tick(now_ms, &mut surface, &mut delay) == TickResult::Rendered {
            renders = renders.saturating_add(1);
        }

        if report_start.elapsed() >= HalDuration::from_secs(HEAP_REPORT_INTERVAL_SECS) {
            let free = free_heap();
            app.telemetry_mut().free_heap_kb = (free / 1024) as u32;
            info!(
                "screen={:?} renders={} free_heap={} cached={}",
                app.current_screen(),
                renders,
                free,
                app.cache().held_bytes()
            );
            renders = 0;
            report_start = Instant::now();
        }

        Timer::after_millis(1).await;
    }
}
