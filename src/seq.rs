// seq.rs - 序列变换

/// 单个碱基互补
///
/// - A ↔ T, G ↔ C, R ↔ Y
/// - 保留大小写
/// - 其他字符原样返回
pub fn complement_base(base: char) -> char {
    match base {
        'A' => 'T',
        'T' => 'A',
        'G' => 'C',
        'C' => 'G',
        'R' => 'Y',
        'Y' => 'R',
        'a' => 't',
        't' => 'a',
        'g' => 'c',
        'c' => 'g',
        'r' => 'y',
        'y' => 'r',
        _ => base,
    }
}

pub fn complement(sequence: &str) -> String {
    sequence.chars().map(complement_base).collect()
}

pub fn reverse(sequence: &str) -> String {
    sequence.chars().rev().collect()
}

/// DNA 序列反向互补
pub fn reverse_complement(sequence: &str) -> String {
    sequence.chars().rev().map(complement_base).collect()
}

/// Flags applied to every barcode when a table is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalization {
    pub reverse: bool,
    pub complement: bool,
}

impl Normalization {
    pub fn new(reverse: bool, complement: bool) -> Self {
        Normalization { reverse, complement }
    }

    pub fn apply(&self, sequence: &str) -> String {
        normalize(sequence, self.reverse, self.complement)
    }
}

/// Reverse and/or complement `sequence`. Both steps are involutions and
/// commute, so applying the same flags twice returns the input.
pub fn normalize(sequence: &str, reverse: bool, complement: bool) -> String {
    match (reverse, complement) {
        (false, false) => sequence.to_string(),
        (true, false) => self::reverse(sequence),
        (false, true) => self::complement(sequence),
        (true, true) => reverse_complement(sequence),
    }
}

/// Left-anchored prefix of at most `len` characters.
pub fn prefix(sequence: &str, len: usize) -> &str {
    match sequence.char_indices().nth(len) {
        Some((end, _)) => &sequence[..end],
        None => sequence,
    }
}
