//! CPU state and the fetch-decode-execute loop.
//!
//! Whole-instruction stepping: `step()` fetches the opcode at PC, looks
//! up its decode-table entry, resolves the addressing mode, runs the
//! semantic arm, accounts cycles (base cost plus any conditional
//! page-cross or decimal-mode penalty) and advances PC unless the arm
//! redirected control flow.

use emu_core::{Cpu, MemoryMap};

use crate::Status;
use crate::flags::{C, D, I, N, V, Z};
use crate::registers::Registers;
use crate::table::{Mode, Op, OpEntry, Variant, decode_table};

/// Host callback for the interrupt breakout check.
///
/// Invoked with the current cycle count after CLI, PLP and RTI — the
/// points where a freshly cleared I flag can make a pending interrupt
/// deliverable. The return value is adopted as the cycle count verbatim,
/// so a hook can push the counter past the budget to stop [`Cpu65xx::run`].
pub type BreakoutHook = Box<dyn FnMut(i32) -> i32>;

/// The MOS 6502 / WDC 65C02 CPU.
pub struct Cpu65xx {
    /// CPU registers.
    pub regs: Registers,

    /// Cycle counter. Signed so the host can bias it negative and run
    /// against a time budget; every instruction adds its cost.
    pub clk: i32,

    variant: Variant,
    table: &'static [OpEntry; 256],
    breakout: Option<BreakoutHook>,
}

impl Cpu65xx {
    /// Create a CPU of the given variant in the post-reset register
    /// state. No memory is touched; the host points PC wherever its
    /// reset logic dictates.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self {
            regs: Registers::new(),
            clk: 0,
            variant,
            table: decode_table(variant),
            breakout: None,
        }
    }

    /// An NMOS 6502.
    #[must_use]
    pub fn nmos() -> Self {
        Self::new(Variant::Nmos)
    }

    /// A CMOS 65C02.
    #[must_use]
    pub fn cmos() -> Self {
        Self::new(Variant::Cmos)
    }

    /// Which variant this CPU is.
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Install the interrupt breakout hook.
    pub fn set_breakout_hook(&mut self, hook: BreakoutHook) {
        self.breakout = Some(hook);
    }

    /// Run instructions while the cycle counter is negative.
    ///
    /// The host sets `clk` to minus its budget; the loop exits once the
    /// budget is consumed (or the breakout hook forces the counter
    /// non-negative). The core never terminates on its own account.
    pub fn run(&mut self, mem: &mut MemoryMap) {
        while self.clk < 0 {
            self.step(mem);
        }
    }

    /// Take a maskable interrupt: push PC and status (B clear), set I,
    /// load PC from $FFFE. Whether an IRQ is due is the host's decision.
    pub fn irq(&mut self, mem: &mut MemoryMap) {
        self.interrupt_entry(mem, 0xFFFE);
    }

    /// Take a non-maskable interrupt through the $FFFA vector.
    pub fn nmi(&mut self, mem: &mut MemoryMap) {
        self.interrupt_entry(mem, 0xFFFA);
    }

    fn interrupt_entry(&mut self, mem: &mut MemoryMap, vector: u16) {
        let pc = self.regs.pc;
        mem.push16(&mut self.regs.sp, pc);
        let p = self.regs.p.to_pushed_irq();
        mem.push8(&mut self.regs.sp, p);
        self.regs.p.set(I);
        if self.variant == Variant::Cmos {
            self.regs.p.clear(D);
        }
        self.regs.pc = mem.read16(vector, &mut self.clk);
        self.clk += 7;
    }

    fn breakout_check(&mut self) {
        if let Some(hook) = self.breakout.as_mut() {
            self.clk = hook(self.clk);
        }
    }

    // ========================================================================
    // Operand access
    // ========================================================================

    /// Fetch the operand for a read-class operation. A page cross during
    /// indexed address computation costs one cycle here; write and RMW
    /// forms pay a fixed penalty folded into their table entry instead.
    fn read_operand(&mut self, mem: &mut MemoryMap, mode: Mode) -> u8 {
        match mode {
            Mode::Accumulator => self.regs.a,
            Mode::Immediate => self.operand8(mem),
            mode => {
                let operand = self.resolve(mem, mode);
                if operand.crossed {
                    self.clk += 1;
                }
                self.load_operand(mem, mode, operand.addr)
            }
        }
    }

    /// Prefetch, compute, write back. Returns the written value for the
    /// combined undocumented ops that feed it into the accumulator.
    fn rmw(
        &mut self,
        mem: &mut MemoryMap,
        mode: Mode,
        f: impl FnOnce(&mut Self, u8) -> u8,
    ) -> u8 {
        if mode == Mode::Accumulator {
            let a = self.regs.a;
            let result = f(self, a);
            self.regs.a = result;
            result
        } else {
            let operand = self.resolve(mem, mode);
            let value = self.load_operand(mem, mode, operand.addr);
            let result = f(self, value);
            self.store_operand(mem, mode, operand.addr, result);
            result
        }
    }

    /// No-read prefetch and store.
    fn store(&mut self, mem: &mut MemoryMap, mode: Mode, value: u8) {
        let operand = self.resolve(mem, mode);
        self.store_operand(mem, mode, operand.addr, value);
    }

    // ========================================================================
    // Fetch-decode-execute
    // ========================================================================

    fn execute(&mut self, mem: &mut MemoryMap, entry: OpEntry) {
        self.clk += i32::from(entry.cycles);
        let mut jumped = false;

        match entry.op {
            // ----------------------------------------------------------------
            // Loads and stores
            // ----------------------------------------------------------------
            Op::Lda => {
                let v = self.read_operand(mem, entry.mode);
                self.regs.a = v;
                self.regs.p.update_nz(v);
            }
            Op::Ldx => {
                let v = self.read_operand(mem, entry.mode);
                self.regs.x = v;
                self.regs.p.update_nz(v);
            }
            Op::Ldy => {
                let v = self.read_operand(mem, entry.mode);
                self.regs.y = v;
                self.regs.p.update_nz(v);
            }
            Op::Sta => {
                let v = self.regs.a;
                self.store(mem, entry.mode, v);
            }
            Op::Stx => {
                let v = self.regs.x;
                self.store(mem, entry.mode, v);
            }
            Op::Sty => {
                let v = self.regs.y;
                self.store(mem, entry.mode, v);
            }
            Op::Stz => self.store(mem, entry.mode, 0),

            // ----------------------------------------------------------------
            // ALU
            // ----------------------------------------------------------------
            Op::Ora => {
                let v = self.read_operand(mem, entry.mode);
                self.regs.a |= v;
                self.regs.p.update_nz(self.regs.a);
            }
            Op::And => {
                let v = self.read_operand(mem, entry.mode);
                self.regs.a &= v;
                self.regs.p.update_nz(self.regs.a);
            }
            Op::Eor => {
                let v = self.read_operand(mem, entry.mode);
                self.regs.a ^= v;
                self.regs.p.update_nz(self.regs.a);
            }
            Op::Adc => {
                let v = self.read_operand(mem, entry.mode);
                self.op_adc(v);
            }
            Op::Sbc => {
                let v = self.read_operand(mem, entry.mode);
                self.op_sbc(v);
            }
            Op::Cmp => {
                let v = self.read_operand(mem, entry.mode);
                self.compare(self.regs.a, v);
            }
            Op::Cpx => {
                let v = self.read_operand(mem, entry.mode);
                self.compare(self.regs.x, v);
            }
            Op::Cpy => {
                let v = self.read_operand(mem, entry.mode);
                self.compare(self.regs.y, v);
            }
            Op::Bit => {
                let v = self.read_operand(mem, entry.mode);
                // BIT #imm affects Z only.
                if entry.mode != Mode::Immediate {
                    self.regs.p.set_if(N, v & 0x80 != 0);
                    self.regs.p.set_if(V, v & 0x40 != 0);
                }
                self.regs.p.set_if(Z, self.regs.a & v == 0);
            }

            // ----------------------------------------------------------------
            // Read-modify-write
            // ----------------------------------------------------------------
            Op::Asl => {
                self.rmw(mem, entry.mode, Self::do_asl);
            }
            Op::Lsr => {
                self.rmw(mem, entry.mode, Self::do_lsr);
            }
            Op::Rol => {
                self.rmw(mem, entry.mode, Self::do_rol);
            }
            Op::Ror => {
                self.rmw(mem, entry.mode, Self::do_ror);
            }
            Op::Inc => {
                self.rmw(mem, entry.mode, Self::do_inc);
            }
            Op::Dec => {
                self.rmw(mem, entry.mode, Self::do_dec);
            }
            Op::Tsb => {
                self.rmw(mem, entry.mode, |cpu, v| {
                    cpu.regs.p.set_if(Z, cpu.regs.a & v == 0);
                    v | cpu.regs.a
                });
            }
            Op::Trb => {
                self.rmw(mem, entry.mode, |cpu, v| {
                    cpu.regs.p.set_if(Z, cpu.regs.a & v == 0);
                    v & !cpu.regs.a
                });
            }

            // ----------------------------------------------------------------
            // Register transfers and counts
            // ----------------------------------------------------------------
            Op::Tax => {
                self.regs.x = self.regs.a;
                self.regs.p.update_nz(self.regs.x);
            }
            Op::Tay => {
                self.regs.y = self.regs.a;
                self.regs.p.update_nz(self.regs.y);
            }
            Op::Txa => {
                self.regs.a = self.regs.x;
                self.regs.p.update_nz(self.regs.a);
            }
            Op::Tya => {
                self.regs.a = self.regs.y;
                self.regs.p.update_nz(self.regs.a);
            }
            Op::Tsx => {
                self.regs.x = self.regs.sp;
                self.regs.p.update_nz(self.regs.x);
            }
            // TXS is the one transfer that leaves the flags alone.
            Op::Txs => self.regs.sp = self.regs.x,
            Op::Inx => {
                self.regs.x = self.regs.x.wrapping_add(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Op::Iny => {
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.p.update_nz(self.regs.y);
            }
            Op::Dex => {
                self.regs.x = self.regs.x.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Op::Dey => {
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.y);
            }
            Op::Ina => {
                self.regs.a = self.regs.a.wrapping_add(1);
                self.regs.p.update_nz(self.regs.a);
            }
            Op::Dea => {
                self.regs.a = self.regs.a.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.a);
            }
            Op::Nop => {}

            // ----------------------------------------------------------------
            // Flag manipulation
            // ----------------------------------------------------------------
            Op::Clc => self.regs.p.clear(C),
            Op::Sec => self.regs.p.set(C),
            Op::Cli => {
                self.regs.p.clear(I);
                self.breakout_check();
            }
            Op::Sei => self.regs.p.set(I),
            Op::Clv => self.regs.p.clear(V),
            Op::Cld => self.regs.p.clear(D),
            Op::Sed => self.regs.p.set(D),

            // ----------------------------------------------------------------
            // Stack
            // ----------------------------------------------------------------
            Op::Pha => {
                let v = self.regs.a;
                mem.push8(&mut self.regs.sp, v);
            }
            Op::Phx => {
                let v = self.regs.x;
                mem.push8(&mut self.regs.sp, v);
            }
            Op::Phy => {
                let v = self.regs.y;
                mem.push8(&mut self.regs.sp, v);
            }
            Op::Php => {
                let v = self.regs.p.to_pushed();
                mem.push8(&mut self.regs.sp, v);
            }
            Op::Pla => {
                let v = mem.pop8(&mut self.regs.sp);
                self.regs.a = v;
                self.regs.p.update_nz(v);
            }
            Op::Plx => {
                let v = mem.pop8(&mut self.regs.sp);
                self.regs.x = v;
                self.regs.p.update_nz(v);
            }
            Op::Ply => {
                let v = mem.pop8(&mut self.regs.sp);
                self.regs.y = v;
                self.regs.p.update_nz(v);
            }
            Op::Plp => {
                let v = mem.pop8(&mut self.regs.sp);
                self.regs.p = Status::from_popped(v);
                self.breakout_check();
            }

            // ----------------------------------------------------------------
            // Control transfer
            // ----------------------------------------------------------------
            Op::Jmp => {
                self.regs.pc = self.operand16(mem);
                jumped = true;
            }
            Op::JmpInd => {
                let ptr = self.operand16(mem);
                self.regs.pc = match self.variant {
                    // NMOS fetches the high byte from the start of the
                    // same page when the pointer sits at $xxFF.
                    Variant::Nmos => mem.read16_page_wrapped(ptr, &mut self.clk),
                    Variant::Cmos => mem.read16(ptr, &mut self.clk),
                };
                jumped = true;
            }
            Op::JmpIndX => {
                let ptr = self.operand16(mem).wrapping_add(u16::from(self.regs.x));
                self.regs.pc = mem.read16(ptr, &mut self.clk);
                jumped = true;
            }
            Op::Jsr => {
                let target = self.operand16(mem);
                // Return address is the JSR's own last byte; RTS adds the 1.
                let ret = self.regs.pc.wrapping_add(2);
                mem.push16(&mut self.regs.sp, ret);
                self.regs.pc = target;
                jumped = true;
            }
            Op::Rts => {
                // The standard one-byte advance below lands on the
                // instruction after the matching JSR.
                self.regs.pc = mem.pop16(&mut self.regs.sp);
            }
            Op::Rti => {
                let p = mem.pop8(&mut self.regs.sp);
                self.regs.p = Status::from_popped(p);
                self.breakout_check();
                self.regs.pc = mem.pop16(&mut self.regs.sp);
                jumped = true;
            }
            Op::Brk => {
                let ret = self.regs.pc.wrapping_add(2);
                mem.push16(&mut self.regs.sp, ret);
                let p = self.regs.p.to_pushed();
                mem.push8(&mut self.regs.sp, p);
                self.regs.p.set(I);
                if self.variant == Variant::Cmos {
                    self.regs.p.clear(D);
                }
                self.regs.pc = mem.read16(0xFFFE, &mut self.clk);
                jumped = true;
            }
            Op::Branch { flag, set } => {
                jumped = self.branch(mem, self.regs.p.is_set(flag) == set);
            }
            Op::Bra => jumped = self.branch(mem, true),

            // ----------------------------------------------------------------
            // NMOS undocumented combined operations
            // ----------------------------------------------------------------
            Op::Slo => {
                let r = self.rmw(mem, entry.mode, Self::do_asl);
                self.regs.a |= r;
                self.regs.p.update_nz(self.regs.a);
            }
            Op::Rla => {
                let r = self.rmw(mem, entry.mode, Self::do_rol);
                self.regs.a &= r;
                self.regs.p.update_nz(self.regs.a);
            }
            Op::Sre => {
                let r = self.rmw(mem, entry.mode, Self::do_lsr);
                self.regs.a ^= r;
                self.regs.p.update_nz(self.regs.a);
            }
            Op::Rra => {
                let r = self.rmw(mem, entry.mode, Self::do_ror);
                self.op_adc(r);
            }
            Op::Sax => {
                let v = self.regs.a & self.regs.x;
                self.store(mem, entry.mode, v);
            }
            Op::Lax => {
                let v = self.read_operand(mem, entry.mode);
                self.regs.a = v;
                self.regs.x = v;
                self.regs.p.update_nz(v);
            }
            Op::Dcp => {
                let r = self.rmw(mem, entry.mode, |_, v| v.wrapping_sub(1));
                self.compare(self.regs.a, r);
            }
            Op::Isb => {
                let r = self.rmw(mem, entry.mode, |_, v| v.wrapping_add(1));
                self.op_sbc(r);
            }
            Op::Anc => {
                let v = self.read_operand(mem, entry.mode);
                self.regs.a &= v;
                self.regs.p.update_nz(self.regs.a);
                let n = self.regs.p.is_set(N);
                self.regs.p.set_if(C, n);
            }
            Op::Alr => {
                let v = self.read_operand(mem, entry.mode) & self.regs.a;
                self.regs.p.set_if(C, v & 0x01 != 0);
                self.regs.a = v >> 1;
                self.regs.p.update_nz(self.regs.a);
            }
            Op::Arr => {
                // Rotate right of A & operand; only C changes, Z/N are
                // left as they were.
                let v = self.read_operand(mem, entry.mode) & self.regs.a;
                let carry_in = if self.regs.p.is_set(C) { 0x80 } else { 0 };
                self.regs.p.set_if(C, v & 0x01 != 0);
                self.regs.a = (v >> 1) | carry_in;
            }

            // Timed no-ops: consume their classified bytes and cycles.
            Op::Axs | Op::Xaa | Op::Ahx | Op::Tas | Op::Las | Op::BadOp => {}
        }

        if !jumped {
            self.regs.pc = self.regs.pc.wrapping_add(u16::from(entry.bytes));
        }
    }

    /// Branch state machine: not-taken / taken / taken-page-cross.
    ///
    /// The offset byte is fetched either way (the hardware reads it
    /// before deciding). Returns true when PC was redirected.
    fn branch(&mut self, mem: &mut MemoryMap, taken: bool) -> bool {
        let target = self.resolve(mem, Mode::Relative).addr;
        if !taken {
            return false;
        }
        self.clk += 1;
        let fallthrough = self.regs.pc.wrapping_add(2);
        if (target ^ fallthrough) & 0xFF00 != 0 {
            self.clk += 1;
        }
        self.regs.pc = target;
        true
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    fn op_adc(&mut self, value: u8) {
        if self.regs.p.is_set(D) {
            match self.variant {
                Variant::Nmos => self.adc_decimal_nmos(value),
                Variant::Cmos => {
                    self.adc_decimal_cmos(value);
                    self.clk += 1;
                }
            }
        } else {
            self.adc_binary(value);
        }
    }

    fn op_sbc(&mut self, value: u8) {
        if self.regs.p.is_set(D) {
            match self.variant {
                Variant::Nmos => self.sbc_decimal_nmos(value),
                Variant::Cmos => {
                    self.sbc_decimal_cmos(value);
                    self.clk += 1;
                }
            }
        } else {
            self.sbc_binary(value);
        }
    }

    fn adc_binary(&mut self, value: u8) {
        let a = self.regs.a;
        let carry = u16::from(self.regs.p.is_set(C));
        let sum = u16::from(a) + u16::from(value) + carry;
        let result = sum as u8;

        self.regs.p.set_if(C, sum > 0xFF);
        self.regs
            .p
            .set_if(V, (a ^ result) & (value ^ result) & 0x80 != 0);
        self.regs.a = result;
        self.regs.p.update_nz(result);
    }

    fn sbc_binary(&mut self, value: u8) {
        let a = self.regs.a;
        let borrow = u16::from(!self.regs.p.is_set(C));
        let diff = u16::from(a).wrapping_sub(u16::from(value)).wrapping_sub(borrow);
        let result = diff as u8;

        self.regs.p.set_if(C, diff < 0x100);
        self.regs
            .p
            .set_if(V, (a ^ value) & (a ^ result) & 0x80 != 0);
        self.regs.a = result;
        self.regs.p.update_nz(result);
    }

    /// NMOS decimal ADC. N and V come from the intermediate value before
    /// the tens correction; Z comes from the plain binary sum. Both are
    /// hardware inaccuracies that must be reproduced.
    fn adc_decimal_nmos(&mut self, value: u8) {
        let a = self.regs.a;
        let carry = i32::from(self.regs.p.is_set(C));

        let binary = i32::from(a) + i32::from(value) + carry;
        self.regs.p.set_if(Z, binary as u8 == 0);

        let mut lo = i32::from(a & 0x0F) + i32::from(value & 0x0F) + carry;
        let mut hi = 0;
        if lo > 9 {
            lo -= 10;
            lo &= 0x0F;
            hi = 0x10;
        }
        hi += i32::from(a & 0xF0) + i32::from(value & 0xF0);

        self.regs.p.set_if(N, hi & 0x80 != 0);
        self.regs
            .p
            .set_if(V, (hi ^ i32::from(a)) & (hi ^ i32::from(value)) & 0x80 != 0);

        let carry_out = hi > 0x90;
        if carry_out {
            hi -= 0xA0;
        }
        self.regs.p.set_if(C, carry_out);
        self.regs.a = (hi | lo) as u8;
    }

    /// NMOS decimal SBC. Z and N come from the binary difference.
    fn sbc_decimal_nmos(&mut self, value: u8) {
        let a = self.regs.a;
        let borrow = i32::from(!self.regs.p.is_set(C));

        let binary = i32::from(a) - i32::from(value) - borrow;
        self.regs.p.set_if(Z, binary as u8 == 0);
        self.regs.p.set_if(N, binary & 0x80 != 0);
        self.regs.p.set_if(
            V,
            (i32::from(a) ^ i32::from(value)) & (i32::from(a) ^ binary) & 0x80 != 0,
        );

        let mut lo = i32::from(a & 0x0F) - i32::from(value & 0x0F) - borrow;
        let mut hi = 0;
        if lo & 0x10 != 0 {
            lo -= 6;
            lo &= 0x0F;
            hi = -0x10;
        }
        hi += i32::from(a & 0xF0) - i32::from(value & 0xF0);

        if hi & 0x100 != 0 {
            hi -= 0x60;
            self.regs.p.clear(C);
        } else {
            self.regs.p.set(C);
        }
        self.regs.a = (hi | lo) as u8;
    }

    /// CMOS decimal ADC: same correction ladder, but Z and N reflect the
    /// corrected result. The extra cycle is billed by the caller.
    fn adc_decimal_cmos(&mut self, value: u8) {
        let a = self.regs.a;
        let carry = i32::from(self.regs.p.is_set(C));

        let mut lo = i32::from(a & 0x0F) + i32::from(value & 0x0F) + carry;
        let mut hi = 0;
        if lo > 9 {
            lo -= 10;
            lo &= 0x0F;
            hi = 0x10;
        }
        hi += i32::from(a & 0xF0) + i32::from(value & 0xF0);

        self.regs.p.set_if(
            V,
            (i32::from(a) ^ i32::from(value)) & 0x80 == 0 && (i32::from(a) ^ hi) & 0x80 != 0,
        );

        let carry_out = hi > 0x90;
        if carry_out {
            hi -= 0xA0;
        }
        self.regs.p.set_if(C, carry_out);

        let result = (hi | lo) as u8;
        self.regs.a = result;
        self.regs.p.update_nz(result);
    }

    /// CMOS decimal SBC: binary difference with binary-rule C and V,
    /// then the decimal correction; Z and N reflect the corrected result.
    fn sbc_decimal_cmos(&mut self, value: u8) {
        let a = self.regs.a;
        let borrow = i32::from(!self.regs.p.is_set(C));

        let mut result = i32::from(a) - i32::from(value) - borrow;
        self.regs.p.set_if(
            V,
            (i32::from(a) ^ i32::from(value)) & (i32::from(a) ^ result) & 0x80 != 0,
        );
        self.regs.p.set_if(C, result >= 0);

        let lo = i32::from(a & 0x0F) - i32::from(value & 0x0F) - borrow;
        if result < 0 {
            result -= 0x60;
        }
        if lo < 0 {
            result -= 0x06;
        }

        let result = result as u8;
        self.regs.a = result;
        self.regs.p.update_nz(result);
    }

    /// Compare: subtraction without writeback, V unaffected.
    fn compare(&mut self, reg: u8, value: u8) {
        let result = reg.wrapping_sub(value);
        self.regs.p.set_if(C, reg >= value);
        self.regs.p.update_nz(result);
    }

    // ========================================================================
    // Shift/rotate and inc/dec cores
    // ========================================================================

    fn do_asl(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(C, value & 0x80 != 0);
        let result = value << 1;
        self.regs.p.update_nz(result);
        result
    }

    fn do_lsr(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(C, value & 0x01 != 0);
        let result = value >> 1;
        self.regs.p.update_nz(result);
        result
    }

    fn do_rol(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.is_set(C));
        self.regs.p.set_if(C, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    fn do_ror(&mut self, value: u8) -> u8 {
        let carry_in = if self.regs.p.is_set(C) { 0x80 } else { 0 };
        self.regs.p.set_if(C, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    fn do_inc(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.regs.p.update_nz(result);
        result
    }

    fn do_dec(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.regs.p.update_nz(result);
        result
    }
}

impl Cpu for Cpu65xx {
    type Registers = Registers;

    fn step(&mut self, mem: &mut MemoryMap) -> i32 {
        let start = self.clk;
        let opcode = mem.read8(self.regs.pc, &mut self.clk);
        let entry = self.table[opcode as usize];
        self.execute(mem, entry);
        self.clk - start
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Registers {
        self.regs
    }
}
