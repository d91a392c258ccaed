//! Opcode decode tables.
//!
//! Two 256-entry tables (NMOS 6502, CMOS 65C02) map each opcode byte to
//! operation, addressing mode, base cycle cost and instruction length.
//! The tables are built from the `aaa bbb cc` encoding groups the 6502
//! instruction set is laid out in, with later rules overriding earlier
//! ones; any byte still unassigned afterwards is filled with a bad-op
//! entry classified purely by its bit fields.

use std::sync::LazyLock;

use crate::flags::{C, N, V, Z};

/// CPU variant selecting one of the two decode tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// NMOS 6502: undocumented opcodes, indirect-JMP page-wrap bug,
    /// decimal-mode flags from the uncorrected intermediate.
    Nmos,
    /// CMOS 65C02: extra instructions, fixed indirect JMP, decimal-mode
    /// flags from the corrected result at one extra cycle.
    Cmos,
}

/// Addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No operand.
    Implied,
    /// Operand is the accumulator.
    Accumulator,
    /// `#$nn`
    Immediate,
    /// `$nn`
    ZeroPage,
    /// `$nn,X` - index wraps mod 256
    ZeroPageX,
    /// `$nn,Y` - index wraps mod 256
    ZeroPageY,
    /// `$nnnn`
    Absolute,
    /// `$nnnn,X`
    AbsoluteX,
    /// `$nnnn,Y`
    AbsoluteY,
    /// `($nn)` - CMOS only
    Indirect,
    /// `($nn,X)` - index added before the deref, wraps mod 256
    IndexedIndirect,
    /// `($nn),Y` - index added after the deref
    IndirectIndexed,
    /// Branch offset, signed, relative to PC+2
    Relative,
}

impl Mode {
    /// Operand bytes following the opcode.
    #[must_use]
    pub const fn operand_bytes(self) -> u8 {
        match self {
            Self::Implied | Self::Accumulator => 0,
            Self::Absolute | Self::AbsoluteX | Self::AbsoluteY => 2,
            _ => 1,
        }
    }

    /// Base cycle cost assuming an operand read, before penalties.
    const fn base_cycles(self) -> u8 {
        match self {
            Self::Implied | Self::Accumulator | Self::Immediate | Self::Relative => 2,
            Self::ZeroPage => 3,
            Self::ZeroPageX
            | Self::ZeroPageY
            | Self::Absolute
            | Self::AbsoluteX
            | Self::AbsoluteY => 4,
            Self::Indirect | Self::IndirectIndexed => 5,
            Self::IndexedIndirect => 6,
        }
    }

    /// Modes where indexing can cross a page boundary.
    const fn can_cross(self) -> bool {
        matches!(self, Self::AbsoluteX | Self::AbsoluteY | Self::IndirectIndexed)
    }
}

/// Operations. The executor dispatches on this; variant-specific behavior
/// (decimal flags, BRK flag handling, indirect-JMP wrap) keys off the
/// CPU's variant, not separate table entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    // Loads and stores
    Lda,
    Ldx,
    Ldy,
    Sta,
    Stx,
    Sty,
    Stz,
    // ALU
    Ora,
    And,
    Eor,
    Adc,
    Sbc,
    Cmp,
    Cpx,
    Cpy,
    Bit,
    // Read-modify-write
    Asl,
    Lsr,
    Rol,
    Ror,
    Inc,
    Dec,
    Tsb,
    Trb,
    // Register transfers and counts
    Tax,
    Tay,
    Txa,
    Tya,
    Tsx,
    Txs,
    Inx,
    Iny,
    Dex,
    Dey,
    Ina,
    Dea,
    Nop,
    // Flag manipulation
    Clc,
    Sec,
    Cli,
    Sei,
    Clv,
    Cld,
    Sed,
    // Stack
    Pha,
    Pla,
    Php,
    Plp,
    Phx,
    Plx,
    Phy,
    Ply,
    // Control transfer
    Jmp,
    JmpInd,
    JmpIndX,
    Jsr,
    Rts,
    Rti,
    Brk,
    /// Conditional branch: `flag` is the status mask to test, `set` the
    /// polarity that takes the branch.
    Branch { flag: u8, set: bool },
    Bra,
    // NMOS undocumented combined operations
    Slo,
    Rla,
    Sre,
    Rra,
    Sax,
    Lax,
    Dcp,
    Isb,
    Anc,
    Alr,
    Arr,
    Axs,
    Xaa,
    Ahx,
    Tas,
    Las,
    /// Unassigned encoding: consumes its classified bytes and cycles,
    /// touches nothing.
    BadOp,
}

impl Op {
    /// Prefetch, compute, write back. Pays the writeback cycles and the
    /// fixed indexing penalty.
    const fn is_rmw(self) -> bool {
        matches!(
            self,
            Self::Asl
                | Self::Lsr
                | Self::Rol
                | Self::Ror
                | Self::Inc
                | Self::Dec
                | Self::Tsb
                | Self::Trb
                | Self::Slo
                | Self::Rla
                | Self::Sre
                | Self::Rra
                | Self::Dcp
                | Self::Isb
        )
    }

    /// No operand read; pays the fixed indexing penalty.
    const fn is_store(self) -> bool {
        matches!(self, Self::Sta | Self::Stx | Self::Sty | Self::Stz | Self::Sax)
    }
}

/// One decode table entry.
#[derive(Debug, Clone, Copy)]
pub struct OpEntry {
    /// The operation to perform.
    pub op: Op,
    /// How the operand is addressed.
    pub mode: Mode,
    /// Base cycle cost; conditional page-cross and decimal-mode penalties
    /// are added by the executor.
    pub cycles: u8,
    /// Total instruction length including the opcode byte.
    pub bytes: u8,
}

/// Base cycle cost for an operation/mode pair.
///
/// Writeback costs 2 cycles over a pure read of the same mode; stores use
/// a no-read prefetch that gives those 2 back. Stores and RMW ops pay the
/// indexing penalty cycle whether or not the access crosses a page; pure
/// reads pay it only on a cross, which the executor accounts for.
fn cycles_for(op: Op, mode: Mode, variant: Variant) -> u8 {
    match op {
        Op::Brk => 7,
        Op::Jsr | Op::Rts | Op::Rti | Op::JmpIndX => 6,
        Op::JmpInd => match variant {
            Variant::Nmos => 5,
            Variant::Cmos => 6,
        },
        Op::Jmp => 3,
        Op::Php | Op::Pha | Op::Phx | Op::Phy => 3,
        Op::Plp | Op::Pla | Op::Plx | Op::Ply => 4,
        Op::Branch { .. } | Op::Bra => 2,
        op if op.is_rmw() => {
            if matches!(mode, Mode::Accumulator) {
                2
            } else {
                mode.base_cycles() + 2 + u8::from(mode.can_cross())
            }
        }
        op if op.is_store() => mode.base_cycles() + u8::from(mode.can_cross()),
        _ => mode.base_cycles(),
    }
}

struct Builder {
    variant: Variant,
    slots: [Option<OpEntry>; 256],
}

impl Builder {
    fn new(variant: Variant) -> Self {
        Self {
            variant,
            slots: [None; 256],
        }
    }

    /// Assign an entry, deriving cycles and length from the pair. A later
    /// rule silently wins over an earlier one, but the collision is
    /// diagnostic-worthy and goes to stderr.
    fn set(&mut self, byte: u8, op: Op, mode: Mode) {
        self.put(
            byte,
            OpEntry {
                op,
                mode,
                cycles: cycles_for(op, mode, self.variant),
                bytes: 1 + mode.operand_bytes(),
            },
        );
    }

    fn put(&mut self, byte: u8, entry: OpEntry) {
        if let Some(old) = self.slots[byte as usize] {
            eprintln!(
                "opcode table ({:?}): ${byte:02X} {:?}/{:?} overridden by {:?}/{:?}",
                self.variant, old.op, old.mode, entry.op, entry.mode
            );
        }
        self.slots[byte as usize] = Some(entry);
    }

    fn finish(self) -> [OpEntry; 256] {
        let mut table = [OpEntry {
            op: Op::BadOp,
            mode: Mode::Implied,
            cycles: 2,
            bytes: 1,
        }; 256];
        for (idx, slot) in self.slots.iter().enumerate() {
            match slot {
                Some(entry) => table[idx] = *entry,
                None => panic!("opcode ${idx:02X} left unassigned after table build"),
            }
        }
        table
    }
}

/// Mode classification rows for the `cc` bit field, used by the bad-op
/// fill. An empty slot classifies as implied.
const fn badop_mode_row(cc: u8) -> [Option<Mode>; 8] {
    match cc {
        0 => [
            Some(Mode::Immediate),
            Some(Mode::ZeroPage),
            None,
            Some(Mode::Absolute),
            None,
            Some(Mode::ZeroPageX),
            None,
            Some(Mode::AbsoluteX),
        ],
        2 => [
            Some(Mode::Immediate),
            Some(Mode::ZeroPage),
            Some(Mode::Accumulator),
            Some(Mode::Absolute),
            None,
            Some(Mode::ZeroPageX),
            None,
            Some(Mode::AbsoluteX),
        ],
        _ => [
            Some(Mode::IndexedIndirect),
            Some(Mode::ZeroPage),
            Some(Mode::Immediate),
            Some(Mode::Absolute),
            Some(Mode::IndirectIndexed),
            Some(Mode::ZeroPageX),
            Some(Mode::AbsoluteY),
            Some(Mode::AbsoluteX),
        ],
    }
}

fn build(variant: Variant) -> [OpEntry; 256] {
    let mut b = Builder::new(variant);

    // The eight modes of the cc=1/cc=3 encoding columns, in bbb order.
    const INDEXED_MODES: [Mode; 8] = [
        Mode::IndexedIndirect,
        Mode::ZeroPage,
        Mode::Immediate,
        Mode::Absolute,
        Mode::IndirectIndexed,
        Mode::ZeroPageX,
        Mode::AbsoluteY,
        Mode::AbsoluteX,
    ];

    // NMOS undocumented group, cc=3: combined operations, with the
    // immediate column and the store/load rows swapped around the same
    // way the silicon decodes them.
    if variant == Variant::Nmos {
        const ROWS: [Op; 8] = [
            Op::Slo,
            Op::Rla,
            Op::Sre,
            Op::Rra,
            Op::Sax,
            Op::Lax,
            Op::Dcp,
            Op::Isb,
        ];
        const IMM_ROWS: [Op; 8] = [
            Op::Anc,
            Op::Anc,
            Op::Alr,
            Op::Arr,
            Op::Xaa,
            Op::Lax,
            Op::Axs,
            Op::Sbc,
        ];
        for (aaa, &row_op) in ROWS.iter().enumerate() {
            for (bbb, &row_mode) in INDEXED_MODES.iter().enumerate() {
                let mut op = row_op;
                let mut mode = row_mode;
                if mode == Mode::Immediate {
                    op = IMM_ROWS[aaa];
                }
                if matches!(op, Op::Sax | Op::Lax) {
                    op = match (op, mode) {
                        (Op::Sax, Mode::IndirectIndexed | Mode::AbsoluteX) => Op::Ahx,
                        (Op::Sax, Mode::AbsoluteY) => Op::Tas,
                        (Op::Lax, Mode::AbsoluteY) => Op::Las,
                        (op, _) => op,
                    };
                    mode = match mode {
                        Mode::ZeroPageX => Mode::ZeroPageY,
                        Mode::AbsoluteX => Mode::AbsoluteY,
                        mode => mode,
                    };
                }
                let byte = (aaa as u8) << 5 | (bbb as u8) << 2 | 0x03;
                b.set(byte, op, mode);
            }
        }
    }

    // ALU group, cc=1.
    const ALU_ROWS: [Op; 8] = [
        Op::Ora,
        Op::And,
        Op::Eor,
        Op::Adc,
        Op::Sta,
        Op::Lda,
        Op::Cmp,
        Op::Sbc,
    ];
    for (aaa, &op) in ALU_ROWS.iter().enumerate() {
        for (bbb, &mode) in INDEXED_MODES.iter().enumerate() {
            if op == Op::Sta && mode == Mode::Immediate {
                continue;
            }
            let byte = (aaa as u8) << 5 | (bbb as u8) << 2 | 0x01;
            b.set(byte, op, mode);
        }
        if variant == Variant::Cmos {
            b.set((aaa as u8) << 5 | 0x12, op, Mode::Indirect);
        }
    }

    // RMW group, cc=2. LDX/STX take the Y-indexed forms.
    const RMW_ROWS: [Op; 8] = [
        Op::Asl,
        Op::Rol,
        Op::Lsr,
        Op::Ror,
        Op::Stx,
        Op::Ldx,
        Op::Dec,
        Op::Inc,
    ];
    const RMW_MODES: [Option<Mode>; 8] = [
        Some(Mode::Immediate),
        Some(Mode::ZeroPage),
        Some(Mode::Accumulator),
        Some(Mode::Absolute),
        None,
        Some(Mode::ZeroPageX),
        None,
        Some(Mode::AbsoluteX),
    ];
    for (aaa, &op) in RMW_ROWS.iter().enumerate() {
        for (bbb, &slot) in RMW_MODES.iter().enumerate() {
            let Some(mut mode) = slot else { continue };
            if mode == Mode::Immediate && op != Op::Ldx {
                continue;
            }
            if matches!(op, Op::Ldx | Op::Stx) {
                mode = match mode {
                    Mode::ZeroPageX => Mode::ZeroPageY,
                    Mode::AbsoluteX => Mode::AbsoluteY,
                    mode => mode,
                };
            }
            let byte = (aaa as u8) << 5 | (bbb as u8) << 2 | 0x02;
            b.set(byte, op, mode);
        }
    }

    // Control group, cc=0, with its historical holes.
    const CTRL_ROWS: [Option<Op>; 8] = [
        None,
        Some(Op::Bit),
        Some(Op::Jmp),
        Some(Op::JmpInd),
        Some(Op::Sty),
        Some(Op::Ldy),
        Some(Op::Cpy),
        Some(Op::Cpx),
    ];
    const CTRL_MODES: [Option<Mode>; 8] = [
        Some(Mode::Immediate),
        Some(Mode::ZeroPage),
        None,
        Some(Mode::Absolute),
        None,
        Some(Mode::ZeroPageX),
        None,
        Some(Mode::AbsoluteX),
    ];
    for (aaa, &row) in CTRL_ROWS.iter().enumerate() {
        let Some(op) = row else { continue };
        for (bbb, &slot) in CTRL_MODES.iter().enumerate() {
            let Some(mode) = slot else { continue };
            if mode == Mode::ZeroPage && matches!(op, Op::Jmp | Op::JmpInd) {
                continue;
            }
            if mode == Mode::Immediate && !matches!(op, Op::Ldy | Op::Cpy | Op::Cpx) {
                continue;
            }
            if mode == Mode::ZeroPageX && !matches!(op, Op::Sty | Op::Ldy) {
                continue;
            }
            if mode == Mode::AbsoluteX && op != Op::Ldy {
                continue;
            }
            let byte = (aaa as u8) << 5 | (bbb as u8) << 2;
            b.set(byte, op, mode);
        }
    }

    // Branches: eight condition/sense pairs.
    const BRANCH_FLAGS: [u8; 4] = [N, V, C, Z];
    for i in 0..8u8 {
        b.set(
            i << 5 | 0x10,
            Op::Branch {
                flag: BRANCH_FLAGS[(i / 2) as usize],
                set: i & 1 != 0,
            },
            Mode::Relative,
        );
    }

    b.set(0x00, Op::Brk, Mode::Implied);
    b.set(0x20, Op::Jsr, Mode::Absolute);
    b.set(0x40, Op::Rti, Mode::Implied);
    b.set(0x60, Op::Rts, Mode::Implied);

    // Single-byte columns.
    const COL_08: [Op; 16] = [
        Op::Php,
        Op::Clc,
        Op::Plp,
        Op::Sec,
        Op::Pha,
        Op::Cli,
        Op::Pla,
        Op::Sei,
        Op::Dey,
        Op::Tya,
        Op::Tay,
        Op::Clv,
        Op::Iny,
        Op::Cld,
        Op::Inx,
        Op::Sed,
    ];
    for (i, &op) in COL_08.iter().enumerate() {
        b.set((i as u8) * 0x10 + 0x08, op, Mode::Implied);
    }
    const COL_8A: [Option<Op>; 7] = [
        Some(Op::Txa),
        Some(Op::Txs),
        Some(Op::Tax),
        Some(Op::Tsx),
        Some(Op::Dex),
        None,
        Some(Op::Nop),
    ];
    for (i, &slot) in COL_8A.iter().enumerate() {
        let Some(op) = slot else { continue };
        b.set((i as u8) * 0x10 + 0x8A, op, Mode::Implied);
    }

    // CMOS additions.
    if variant == Variant::Cmos {
        b.set(0x7C, Op::JmpIndX, Mode::AbsoluteX);
        b.set(0x89, Op::Bit, Mode::Immediate);
        b.set(0x34, Op::Bit, Mode::ZeroPageX);
        b.set(0x3C, Op::Bit, Mode::AbsoluteX);
        b.set(0x04, Op::Tsb, Mode::ZeroPage);
        b.set(0x0C, Op::Tsb, Mode::Absolute);
        b.set(0x14, Op::Trb, Mode::ZeroPage);
        b.set(0x1C, Op::Trb, Mode::Absolute);
        b.set(0x64, Op::Stz, Mode::ZeroPage);
        b.set(0x74, Op::Stz, Mode::ZeroPageX);
        b.set(0x9C, Op::Stz, Mode::Absolute);
        b.set(0x9E, Op::Stz, Mode::AbsoluteX);
        b.set(0x80, Op::Bra, Mode::Relative);
        b.set(0x1A, Op::Ina, Mode::Implied);
        b.set(0x3A, Op::Dea, Mode::Implied);
        b.set(0x5A, Op::Phy, Mode::Implied);
        b.set(0x7A, Op::Ply, Mode::Implied);
        b.set(0xDA, Op::Phx, Mode::Implied);
        b.set(0xFA, Op::Plx, Mode::Implied);
    }

    // Bad-op fill: whatever is left gets bytes/cycles derived purely from
    // the opcode's bit-field classification. CMOS bad ops follow a fixed
    // low-nibble table instead, with $44 and $5C as the two exceptions.
    for idx in 0..=255u8 {
        if b.slots[idx as usize].is_some() {
            continue;
        }
        let bbb = (idx >> 2) & 0x07;
        let mode = badop_mode_row(idx & 0x03)[bbb as usize].unwrap_or(Mode::Implied);
        match variant {
            Variant::Nmos => b.set(idx, Op::BadOp, mode),
            Variant::Cmos => {
                let (cycles, bytes) = match idx & 0x0F {
                    0x2 => (2, 2),
                    0x3 | 0x7 | 0xB | 0xF => (1, 1),
                    0x4 => (if idx == 0x44 { 4 } else { 3 }, 2),
                    0xC => (if idx == 0x5C { 7 } else { 4 }, 3),
                    _ => panic!("unexpected CMOS bad op ${idx:02X}"),
                };
                b.put(
                    idx,
                    OpEntry {
                        op: Op::BadOp,
                        mode,
                        cycles,
                        bytes,
                    },
                );
            }
        }
    }

    b.finish()
}

/// The decode table for a variant. Built once, behind a lazy static; the
/// build asserts totality.
#[must_use]
pub fn decode_table(variant: Variant) -> &'static [OpEntry; 256] {
    static NMOS: LazyLock<[OpEntry; 256]> = LazyLock::new(|| build(Variant::Nmos));
    static CMOS: LazyLock<[OpEntry; 256]> = LazyLock::new(|| build(Variant::Cmos));
    match variant {
        Variant::Nmos => &NMOS,
        Variant::Cmos => &CMOS,
    }
}
