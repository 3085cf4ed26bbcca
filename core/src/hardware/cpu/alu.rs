//! Shared rotate/shift primitives; both the A-register shorthands and the
//! CB-prefixed forms funnel through these.

use crate::hardware::cpu::traits::{SetU8, ToU8};
use crate::hardware::cpu::Cpu;
use crate::hardware::mmu::MemoryMapper;

impl<M: MemoryMapper> Cpu<M> {
    /// C <- [7 <- 0] <- [7]
    ///
    /// Flags: `z00c`
    pub(crate) fn rotate_left<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        let value = self.read_u8_value(target);
        let new_value = value.rotate_left(1);

        self.set_rotate_flags(new_value, value & 0x80);
        self.set_u8_value(target, new_value);
    }

    /// C <- [7 <- 0] <- C
    ///
    /// Flags: `z00c`
    pub(crate) fn rotate_left_carry<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        let value = self.read_u8_value(target);
        let new_value = (value << 1) | self.registers.cf() as u8;

        self.set_rotate_flags(new_value, value & 0x80);
        self.set_u8_value(target, new_value);
    }

    /// [0] -> [7 -> 0] -> C
    ///
    /// Flags: `z00c`
    pub(crate) fn rotate_right<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        let value = self.read_u8_value(target);
        let new_value = value.rotate_right(1);

        self.set_rotate_flags(new_value, value & 0x01);
        self.set_u8_value(target, new_value);
    }

    /// C -> [7 -> 0] -> C
    ///
    /// Flags: `z00c`
    pub(crate) fn rotate_right_carry<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        let value = self.read_u8_value(target);
        let new_value = ((self.registers.cf() as u8) << 7) | (value >> 1);

        self.set_rotate_flags(new_value, value & 0x01);
        self.set_u8_value(target, new_value);
    }

    /// C <- [7 <- 0] <- 0
    ///
    /// Flags: `z00c`
    pub(crate) fn shift_left<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        let value = self.read_u8_value(target);
        let new_value = value << 1;

        self.set_rotate_flags(new_value, value & 0x80);
        self.set_u8_value(target, new_value);
    }

    /// 0 -> [7 -> 0] -> C
    ///
    /// Flags: `z00c`
    pub(crate) fn shift_right<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        let value = self.read_u8_value(target);
        let new_value = value >> 1;

        self.set_rotate_flags(new_value, value & 0x01);
        self.set_u8_value(target, new_value);
    }

    #[inline]
    fn set_rotate_flags(&mut self, new_value: u8, carry_check: u8) {
        self.registers.set_zf(new_value == 0);
        self.registers.set_n(false);
        self.registers.set_h(false);
        self.registers.set_cf(carry_check != 0);
    }
}
