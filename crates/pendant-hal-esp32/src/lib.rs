#![no_std]

//! ESP32 "Cheap Yellow Display" adapters for the pendant core traits.

pub mod input {
    pub mod panel;
}

pub mod platform {
    pub mod display;
}

pub mod serial {
    pub mod uart;
}

pub mod storage {
    pub mod flash_settings;
}

pub mod touch {
    pub mod xpt2046;
}
