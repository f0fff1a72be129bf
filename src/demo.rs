//! The LED-toggle sample program: on a PINB transition at BUTTON1, the
//! pin-change ISR calls a subroutine that toggles LED1 on PORTB and
//! records the new state in data memory at `LED_ENABLED`.
//!
//! Label offsets below mirror a classic AVR-style `program_memory_write`
//! layout, expressed as [`crate::assembler::encode`]d `Program` entries.

use crate::assembler::{encode, Program, Subroutine};
use crate::cpu::instruction::OpCode;
use crate::cpu::{PCINT0_VECT, RESET_VECT};
use crate::io_map::{self, R16, R24};

/// Bit index of LED1 on port B.
pub const LED1: u8 = 0;
/// Bit index of BUTTON1 on port B.
pub const BUTTON1: u8 = 5;
/// Data memory address holding the cached LED-on/off state (0 or 1).
pub const LED_ENABLED: u16 = 100;

const ISR_PCINT0: u8 = 4;
const ISR_PCINT0_END: u8 = ISR_PCINT0 + 4;
const MAIN: u8 = ISR_PCINT0 + 5;
const MAIN_LOOP: u8 = MAIN + 1;
const SETUP: u8 = MAIN + 2;
const LED_TOGGLE: u8 = SETUP + 10;
const LED_TOGGLE_END: u8 = LED_TOGGLE + 4;
const LED_ON: u8 = LED_TOGGLE + 5;
const LED_OFF: u8 = LED_ON + 6;
const END: u8 = LED_OFF + 6;

/// Builds the LED-toggle demo program, ready to hand to
/// [`crate::cpu::Cpu::load_program`].
pub fn led_toggle_program() -> Program {
    use OpCode::*;

    let entries = vec![
        (RESET_VECT, encode(Jmp, MAIN, 0x00)),
        (RESET_VECT + 1, encode(Nop, 0x00, 0x00)),
        (PCINT0_VECT, encode(Jmp, ISR_PCINT0, 0x00)),
        (PCINT0_VECT + 1, encode(Nop, 0x00, 0x00)),
        (ISR_PCINT0, encode(In, R24, io_map::PINB as u8)),
        (ISR_PCINT0 + 1, encode(Andi, R24, 1 << BUTTON1)),
        (ISR_PCINT0 + 2, encode(Breq, ISR_PCINT0_END, 0x00)),
        (ISR_PCINT0 + 3, encode(Call, LED_TOGGLE, 0x00)),
        (ISR_PCINT0_END, encode(Reti, 0x00, 0x00)),
        (MAIN, encode(Call, SETUP, 0x00)),
        (MAIN_LOOP, encode(Jmp, MAIN_LOOP, 0x00)),
        (SETUP, encode(Ldi, R16, 1 << LED1)),
        (SETUP + 1, encode(Out, io_map::DDRB as u8, R16)),
        (SETUP + 2, encode(Ldi, R16, 1 << BUTTON1)),
        (SETUP + 3, encode(Out, io_map::PORTB as u8, R16)),
        (SETUP + 4, encode(Sei, 0x00, 0x00)),
        (SETUP + 5, encode(Ldi, R16, 1 << io_map::PCIE0)),
        (SETUP + 6, encode(Sts, io_map::PCICR as u8, R16)),
        (SETUP + 7, encode(Ldi, R16, 1 << BUTTON1)),
        (SETUP + 8, encode(Sts, io_map::PCMSK0 as u8, R16)),
        (SETUP + 9, encode(Ret, 0x00, 0x00)),
        (LED_TOGGLE, encode(Lds, R16, LED_ENABLED as u8)),
        (LED_TOGGLE + 1, encode(Cpi, R16, 0x00)),
        (LED_TOGGLE + 2, encode(Breq, LED_ON, 0x00)),
        (LED_TOGGLE + 3, encode(Jmp, LED_OFF, 0x00)),
        (LED_TOGGLE_END, encode(Ret, 0x00, 0x00)),
        (LED_ON, encode(In, R16, io_map::PORTB as u8)),
        (LED_ON + 1, encode(Ori, R16, 1 << LED1)),
        (LED_ON + 2, encode(Out, io_map::PORTB as u8, R16)),
        (LED_ON + 3, encode(Ldi, R16, 0x01)),
        (LED_ON + 4, encode(Sts, LED_ENABLED as u8, R16)),
        (LED_ON + 5, encode(Jmp, LED_TOGGLE_END, 0x00)),
        (LED_OFF, encode(In, R16, io_map::PORTB as u8)),
        (LED_OFF + 1, encode(Andi, R16, !(1 << LED1))),
        (LED_OFF + 2, encode(Out, io_map::PORTB as u8, R16)),
        (LED_OFF + 3, encode(Ldi, R16, 0x00)),
        (LED_OFF + 4, encode(Sts, LED_ENABLED as u8, R16)),
        (LED_OFF + 5, encode(Jmp, LED_TOGGLE_END, 0x00)),
    ];

    let subroutines = vec![
        Subroutine { start: RESET_VECT, end: PCINT0_VECT, name: "RESET_vect" },
        Subroutine { start: PCINT0_VECT, end: ISR_PCINT0, name: "PCINT0_vect" },
        Subroutine { start: ISR_PCINT0, end: MAIN, name: "ISR_PCINT0" },
        Subroutine { start: MAIN, end: SETUP, name: "main" },
        Subroutine { start: SETUP, end: LED_TOGGLE, name: "setup" },
        Subroutine { start: LED_TOGGLE, end: LED_ON, name: "led_toggle" },
        Subroutine { start: LED_ON, end: LED_OFF, name: "led_on" },
        Subroutine { start: LED_OFF, end: END, name: "led_off" },
    ];

    Program::new(entries, subroutines)
}
