//! Decimal-mode arithmetic: the NMOS flag quirks and the CMOS corrected
//! behavior, plus the binary-mode overflow rules both share.

use cpu_65xx::{Cpu65xx, Variant};
use emu_core::{Cpu, MemoryMap};

const N: u8 = 0x80;
const V: u8 = 0x40;
const D: u8 = 0x08;
const Z: u8 = 0x02;
const C: u8 = 0x01;

/// Run a single ADC/SBC immediate with the given accumulator, operand
/// and incoming flags; returns the CPU afterwards.
fn arith(variant: Variant, opcode: u8, a: u8, operand: u8, flags: u8) -> Cpu65xx {
    let mut mem = MemoryMap::new();
    mem.load(0x8000, &[opcode, operand]);
    let mut cpu = Cpu65xx::new(variant);
    cpu.regs.pc = 0x8000;
    cpu.regs.a = a;
    cpu.regs.p.0 = flags;
    cpu.step(&mut mem);
    cpu
}

#[test]
fn nmos_adc_invalid_intermediate_quirk() {
    // $79 + $00 + C=1 in BCD: result $80 with C=0, and N reflects the
    // uncorrected value's bit 7 (so does V).
    let cpu = arith(Variant::Nmos, 0x69, 0x79, 0x00, D | C);
    assert_eq!(cpu.regs.a, 0x80);
    assert!(!cpu.regs.p.is_set(C));
    assert!(cpu.regs.p.is_set(N));
    assert!(cpu.regs.p.is_set(V));
    assert!(!cpu.regs.p.is_set(Z));
}

#[test]
fn nmos_adc_zero_flag_tracks_binary_sum() {
    // $99 + $00 + C=1: decimal result is $00, but Z follows the binary
    // sum $9A and stays clear.
    let cpu = arith(Variant::Nmos, 0x69, 0x99, 0x00, D | C);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.p.is_set(C));
    assert!(!cpu.regs.p.is_set(Z), "Z comes from the binary sum on NMOS");
}

#[test]
fn cmos_adc_flags_track_corrected_result() {
    let cpu = arith(Variant::Cmos, 0x69, 0x99, 0x00, D | C);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.p.is_set(C));
    assert!(cpu.regs.p.is_set(Z), "Z comes from the corrected result on CMOS");
    assert!(!cpu.regs.p.is_set(N));
}

#[test]
fn bcd_addition_carry_chain() {
    for variant in [Variant::Nmos, Variant::Cmos] {
        // 58 + 46 + 1 = 105 decimal: A=$05, carry out.
        let cpu = arith(variant, 0x69, 0x58, 0x46, D | C);
        assert_eq!(cpu.regs.a, 0x05, "{variant:?}");
        assert!(cpu.regs.p.is_set(C), "{variant:?}");

        // 12 + 34 = 46, no carry.
        let cpu = arith(variant, 0x69, 0x12, 0x34, D);
        assert_eq!(cpu.regs.a, 0x46, "{variant:?}");
        assert!(!cpu.regs.p.is_set(C), "{variant:?}");
    }
}

#[test]
fn bcd_subtraction() {
    for variant in [Variant::Nmos, Variant::Cmos] {
        // 50 - 25 with borrow clear.
        let cpu = arith(variant, 0xE9, 0x50, 0x25, D | C);
        assert_eq!(cpu.regs.a, 0x25, "{variant:?}");
        assert!(cpu.regs.p.is_set(C), "{variant:?}");

        // 00 - 01 borrows around to 99.
        let cpu = arith(variant, 0xE9, 0x00, 0x01, D | C);
        assert_eq!(cpu.regs.a, 0x99, "{variant:?}");
        assert!(!cpu.regs.p.is_set(C), "{variant:?}");
    }
}

#[test]
fn nmos_sbc_flags_track_binary_difference() {
    // 00 - 01: binary difference $FF drives N; Z stays clear.
    let cpu = arith(Variant::Nmos, 0xE9, 0x00, 0x01, D | C);
    assert!(cpu.regs.p.is_set(N));
    assert!(!cpu.regs.p.is_set(Z));

    // 01 - 01: binary difference is zero.
    let cpu = arith(Variant::Nmos, 0xE9, 0x01, 0x01, D | C);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.p.is_set(Z));
}

#[test]
fn cmos_sbc_flags_track_corrected_result() {
    let cpu = arith(Variant::Cmos, 0xE9, 0x40, 0x13, D | C);
    assert_eq!(cpu.regs.a, 0x27);
    assert!(cpu.regs.p.is_set(C));
    assert!(!cpu.regs.p.is_set(N) && !cpu.regs.p.is_set(Z));

    let cpu = arith(Variant::Cmos, 0xE9, 0x01, 0x01, D | C);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.p.is_set(Z));
}

#[test]
fn binary_adc_overflow_and_carry() {
    // 0x50 + 0x50: signed overflow, no carry.
    let cpu = arith(Variant::Nmos, 0x69, 0x50, 0x50, 0);
    assert_eq!(cpu.regs.a, 0xA0);
    assert!(cpu.regs.p.is_set(V) && cpu.regs.p.is_set(N));
    assert!(!cpu.regs.p.is_set(C));

    // 0xFF + 0x01: carry out, no signed overflow.
    let cpu = arith(Variant::Nmos, 0x69, 0xFF, 0x01, 0);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.p.is_set(C) && cpu.regs.p.is_set(Z));
    assert!(!cpu.regs.p.is_set(V));
}

#[test]
fn binary_sbc_overflow_and_borrow() {
    // 0x50 - 0xB0: signed overflow, borrow taken.
    let cpu = arith(Variant::Nmos, 0xE9, 0x50, 0xB0, C);
    assert_eq!(cpu.regs.a, 0xA0);
    assert!(cpu.regs.p.is_set(V) && cpu.regs.p.is_set(N));
    assert!(!cpu.regs.p.is_set(C));

    // 0x50 - 0x10: clean subtraction.
    let cpu = arith(Variant::Nmos, 0xE9, 0x50, 0x10, C);
    assert_eq!(cpu.regs.a, 0x40);
    assert!(cpu.regs.p.is_set(C));
    assert!(!cpu.regs.p.is_set(V));
}

#[test]
fn decimal_flag_only_changes_adc_sbc() {
    // CMP ignores decimal mode entirely.
    let mut mem = MemoryMap::new();
    mem.load(0x8000, &[0xC9, 0x19]);
    let mut cpu = Cpu65xx::nmos();
    cpu.regs.pc = 0x8000;
    cpu.regs.a = 0x20;
    cpu.regs.p.0 = D;
    cpu.step(&mut mem);
    assert!(cpu.regs.p.is_set(C));
    assert!(!cpu.regs.p.is_set(Z));
    assert_eq!(cpu.regs.a, 0x20);
}
