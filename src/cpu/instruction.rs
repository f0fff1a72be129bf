use crate::alu::AluOp;

/// Raw opcode byte values. Encoded into bits 23..16 of an instruction word
/// by the assembler; decoded back here once per Decode phase.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpCode {
    Nop = 0,
    Ldi = 1,
    Mov = 2,
    Out = 3,
    In = 4,
    Sts = 5,
    Lds = 6,
    Clr = 7,
    Ori = 8,
    Andi = 9,
    Xori = 10,
    Or = 11,
    And = 12,
    Xor = 13,
    Addi = 14,
    Subi = 15,
    Add = 16,
    Sub = 17,
    Inc = 18,
    Dec = 19,
    Lsl = 20,
    Lsr = 21,
    Cpi = 22,
    Cp = 23,
    Jmp = 24,
    Breq = 25,
    Brne = 26,
    Brge = 27,
    Brgt = 28,
    Brle = 29,
    Brlt = 30,
    Call = 31,
    Ret = 32,
    Reti = 33,
    Push = 34,
    Pop = 35,
    Sei = 36,
    Cli = 37,
}

impl OpCode {
    /// Recovers an `OpCode` from its encoded byte, or `None` for any value
    /// this instruction set doesn't define. An undefined byte is the
    /// "unknown opcode" case that triggers a full CPU reset.
    pub fn from_byte(byte: u8) -> Option<Self> {
        use OpCode::*;
        const ALL: &[OpCode] = &[
            Nop, Ldi, Mov, Out, In, Sts, Lds, Clr, Ori, Andi, Xori, Or, And, Xor, Addi, Subi, Add,
            Sub, Inc, Dec, Lsl, Lsr, Cpi, Cp, Jmp, Breq, Brne, Brge, Brgt, Brle, Brlt, Call, Ret,
            Reti, Push, Pop, Sei, Cli,
        ];
        ALL.iter().copied().find(|op| *op as u8 == byte)
    }
}

/// Branch condition, evaluated purely from the status register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
}

/// A fully decoded instruction: the typed alternative to dispatching on raw
/// `(op_code, op1, op2)` bytes throughout Execute.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    Nop,
    Ldi { d: u8, k: u8 },
    Mov { d: u8, s: u8 },
    Out { addr: u8, s: u8 },
    In { d: u8, addr: u8 },
    Sts { addr: u8, s: u8 },
    Lds { d: u8, addr: u8 },
    Clr { d: u8 },
    AluImm { op: AluOp, d: u8, k: u8 },
    AluReg { op: AluOp, d: u8, s: u8 },
    Unary { op: AluOp, d: u8 },
    CpImm { d: u8, k: u8 },
    CpReg { d: u8, s: u8 },
    Jmp { addr: u8 },
    Branch { predicate: Predicate, addr: u8 },
    Call { addr: u8 },
    Ret,
    Reti,
    Push { d: u8 },
    Pop { d: u8 },
    Sei,
    Cli,
    /// Encoded byte did not match any known opcode; Execute responds with a
    /// full CPU reset.
    Unknown,
}

/// Decodes the latched `(op_code, op1, op2)` triple into a typed
/// instruction. Runs once per Decode phase.
pub fn decode(op_code: u8, op1: u8, op2: u8) -> Instruction {
    let Some(op) = OpCode::from_byte(op_code) else {
        return Instruction::Unknown;
    };

    match op {
        OpCode::Nop => Instruction::Nop,
        OpCode::Ldi => Instruction::Ldi { d: op1, k: op2 },
        OpCode::Mov => Instruction::Mov { d: op1, s: op2 },
        OpCode::Out => Instruction::Out { addr: op1, s: op2 },
        OpCode::In => Instruction::In { d: op1, addr: op2 },
        OpCode::Sts => Instruction::Sts { addr: op1, s: op2 },
        OpCode::Lds => Instruction::Lds { d: op1, addr: op2 },
        OpCode::Clr => Instruction::Clr { d: op1 },
        OpCode::Ori => Instruction::AluImm { op: AluOp::Or, d: op1, k: op2 },
        OpCode::Andi => Instruction::AluImm { op: AluOp::And, d: op1, k: op2 },
        OpCode::Xori => Instruction::AluImm { op: AluOp::Xor, d: op1, k: op2 },
        OpCode::Or => Instruction::AluReg { op: AluOp::Or, d: op1, s: op2 },
        OpCode::And => Instruction::AluReg { op: AluOp::And, d: op1, s: op2 },
        OpCode::Xor => Instruction::AluReg { op: AluOp::Xor, d: op1, s: op2 },
        OpCode::Addi => Instruction::AluImm { op: AluOp::Add, d: op1, k: op2 },
        OpCode::Subi => Instruction::AluImm { op: AluOp::Sub, d: op1, k: op2 },
        OpCode::Add => Instruction::AluReg { op: AluOp::Add, d: op1, s: op2 },
        OpCode::Sub => Instruction::AluReg { op: AluOp::Sub, d: op1, s: op2 },
        OpCode::Inc => Instruction::Unary { op: AluOp::Inc, d: op1 },
        OpCode::Dec => Instruction::Unary { op: AluOp::Dec, d: op1 },
        OpCode::Lsl => Instruction::Unary { op: AluOp::Lsl, d: op1 },
        OpCode::Lsr => Instruction::Unary { op: AluOp::Lsr, d: op1 },
        OpCode::Cpi => Instruction::CpImm { d: op1, k: op2 },
        OpCode::Cp => Instruction::CpReg { d: op1, s: op2 },
        OpCode::Jmp => Instruction::Jmp { addr: op1 },
        OpCode::Breq => Instruction::Branch { predicate: Predicate::Eq, addr: op1 },
        OpCode::Brne => Instruction::Branch { predicate: Predicate::Ne, addr: op1 },
        OpCode::Brge => Instruction::Branch { predicate: Predicate::Ge, addr: op1 },
        OpCode::Brgt => Instruction::Branch { predicate: Predicate::Gt, addr: op1 },
        OpCode::Brle => Instruction::Branch { predicate: Predicate::Le, addr: op1 },
        OpCode::Brlt => Instruction::Branch { predicate: Predicate::Lt, addr: op1 },
        OpCode::Call => Instruction::Call { addr: op1 },
        OpCode::Ret => Instruction::Ret,
        OpCode::Reti => Instruction::Reti,
        OpCode::Push => Instruction::Push { d: op1 },
        OpCode::Pop => Instruction::Pop { d: op1 },
        OpCode::Sei => Instruction::Sei,
        OpCode::Cli => Instruction::Cli,
    }
}

/// Returns a short mnemonic name for `print_status`.
pub fn mnemonic(op_code: u8) -> &'static str {
    match OpCode::from_byte(op_code) {
        Some(OpCode::Nop) => "NOP",
        Some(OpCode::Ldi) => "LDI",
        Some(OpCode::Mov) => "MOV",
        Some(OpCode::Out) => "OUT",
        Some(OpCode::In) => "IN",
        Some(OpCode::Sts) => "STS",
        Some(OpCode::Lds) => "LDS",
        Some(OpCode::Clr) => "CLR",
        Some(OpCode::Ori) => "ORI",
        Some(OpCode::Andi) => "ANDI",
        Some(OpCode::Xori) => "XORI",
        Some(OpCode::Or) => "OR",
        Some(OpCode::And) => "AND",
        Some(OpCode::Xor) => "XOR",
        Some(OpCode::Addi) => "ADDI",
        Some(OpCode::Subi) => "SUBI",
        Some(OpCode::Add) => "ADD",
        Some(OpCode::Sub) => "SUB",
        Some(OpCode::Inc) => "INC",
        Some(OpCode::Dec) => "DEC",
        Some(OpCode::Lsl) => "LSL",
        Some(OpCode::Lsr) => "LSR",
        Some(OpCode::Cpi) => "CPI",
        Some(OpCode::Cp) => "CP",
        Some(OpCode::Jmp) => "JMP",
        Some(OpCode::Breq) => "BREQ",
        Some(OpCode::Brne) => "BRNE",
        Some(OpCode::Brge) => "BRGE",
        Some(OpCode::Brgt) => "BRGT",
        Some(OpCode::Brle) => "BRLE",
        Some(OpCode::Brlt) => "BRLT",
        Some(OpCode::Call) => "CALL",
        Some(OpCode::Ret) => "RET",
        Some(OpCode::Reti) => "RETI",
        Some(OpCode::Push) => "PUSH",
        Some(OpCode::Pop) => "POP",
        Some(OpCode::Sei) => "SEI",
        Some(OpCode::Cli) => "CLI",
        None => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_defined_opcode_byte_round_trips_through_decode() {
        for byte in 0..=37u8 {
            assert_ne!(decode(byte, 0, 0), Instruction::Unknown, "byte {byte} should decode");
        }
    }

    #[test]
    fn undefined_opcode_byte_decodes_as_unknown() {
        assert_eq!(decode(200, 1, 2), Instruction::Unknown);
    }

    #[test]
    fn ldi_carries_its_operands_through() {
        assert_eq!(decode(OpCode::Ldi as u8, 16, 5), Instruction::Ldi { d: 16, k: 5 });
    }
}
