//! Addressing-mode resolution.
//!
//! The resolver turns a mode into an effective address plus a
//! page-crossed flag; whether a cross costs a cycle is the executor's
//! call, since it depends on the operation class. Operand bytes come from
//! the instruction stream at PC+1 (PC itself is advanced centrally after
//! the instruction runs). Zero-page pointer fetches use the flat
//! zero-page path and wrap at $FF, reproducing the hardware's behavior.

use emu_core::MemoryMap;

use crate::cpu::Cpu65xx;
use crate::table::Mode;

/// A resolved operand location.
pub(crate) struct Operand {
    /// Effective address.
    pub addr: u16,
    /// Indexed address computation carried into the next page.
    pub crossed: bool,
}

impl Operand {
    const fn at(addr: u16) -> Self {
        Self {
            addr,
            crossed: false,
        }
    }
}

impl Cpu65xx {
    /// Operand byte from the instruction stream.
    pub(crate) fn operand8(&mut self, mem: &mut MemoryMap) -> u8 {
        mem.read8(self.regs.pc.wrapping_add(1), &mut self.clk)
    }

    /// Operand word from the instruction stream, low byte first.
    pub(crate) fn operand16(&mut self, mem: &mut MemoryMap) -> u16 {
        mem.read16(self.regs.pc.wrapping_add(1), &mut self.clk)
    }

    /// Resolve a mode to an effective address.
    pub(crate) fn resolve(&mut self, mem: &mut MemoryMap, mode: Mode) -> Operand {
        match mode {
            Mode::Immediate => Operand::at(self.regs.pc.wrapping_add(1)),
            Mode::ZeroPage => Operand::at(u16::from(self.operand8(mem))),
            Mode::ZeroPageX => {
                let base = self.operand8(mem);
                Operand::at(u16::from(base.wrapping_add(self.regs.x)))
            }
            Mode::ZeroPageY => {
                let base = self.operand8(mem);
                Operand::at(u16::from(base.wrapping_add(self.regs.y)))
            }
            Mode::Absolute => Operand::at(self.operand16(mem)),
            Mode::AbsoluteX => {
                let base = self.operand16(mem);
                Self::indexed(base, self.regs.x)
            }
            Mode::AbsoluteY => {
                let base = self.operand16(mem);
                Self::indexed(base, self.regs.y)
            }
            Mode::Indirect => {
                let ptr = self.operand8(mem);
                Operand::at(mem.read16_zero_page_wrapped(ptr))
            }
            Mode::IndexedIndirect => {
                let ptr = self.operand8(mem).wrapping_add(self.regs.x);
                Operand::at(mem.read16_zero_page_wrapped(ptr))
            }
            Mode::IndirectIndexed => {
                let ptr = self.operand8(mem);
                let base = mem.read16_zero_page_wrapped(ptr);
                Self::indexed(base, self.regs.y)
            }
            Mode::Relative => {
                let offset = self.operand8(mem) as i8;
                Operand::at(self.regs.pc.wrapping_add(2).wrapping_add(offset as u16))
            }
            Mode::Implied | Mode::Accumulator => unreachable!("mode has no address"),
        }
    }

    fn indexed(base: u16, index: u8) -> Operand {
        let addr = base.wrapping_add(u16::from(index));
        Operand {
            addr,
            crossed: (base ^ addr) & 0xFF00 != 0,
        }
    }

    /// Load a resolved operand, taking the flat fast path for zero-page
    /// modes.
    pub(crate) fn load_operand(&mut self, mem: &mut MemoryMap, mode: Mode, addr: u16) -> u8 {
        match mode {
            Mode::ZeroPage | Mode::ZeroPageX | Mode::ZeroPageY => mem.read8_zero_page(addr as u8),
            _ => mem.read8(addr, &mut self.clk),
        }
    }

    /// Write back to a resolved operand through the same path.
    pub(crate) fn store_operand(&mut self, mem: &mut MemoryMap, mode: Mode, addr: u16, value: u8) {
        match mode {
            Mode::ZeroPage | Mode::ZeroPageX | Mode::ZeroPageY => {
                mem.write8_zero_page(addr as u8, value);
            }
            _ => mem.write8(addr, value, &mut self.clk),
        }
    }
}
