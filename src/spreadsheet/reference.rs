//! Conversions between zero-based (row, col) indices and A1-style references.

/// Converts a zero-based column index to its letter name ("A", "Z", "AA", ...).
pub fn index_to_col(col: usize) -> String {
    let mut col = col + 1;
    let mut letters = Vec::<u8>::new();
    while col > 0 {
        col -= 1;
        letters.push(b'A' + (col % 26) as u8);
        col /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).expect("ASCII letters")
}

/// Converts zero-based indices to an A1-style cell reference (e.g. (0, 0) => "A1").
pub fn index_to_reference(row: usize, col: usize) -> String {
    format!("{}{}", index_to_col(col), row + 1)
}

/// Parses column letters (case-insensitive) to a zero-based column index.
pub fn col_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    letters
        .chars()
        .try_fold(0usize, |index, letter| {
            if !letter.is_ascii_alphabetic() {
                return None;
            }
            let digit = (letter.to_ascii_uppercase() as usize) - ('A' as usize) + 1;
            index.checked_mul(26)?.checked_add(digit)
        })
        .map(|index| index - 1)
}

/// Parses a one-based row number to a zero-based row index.
pub fn row_to_index(number: &str) -> Option<usize> {
    number
        .parse::<usize>()
        .ok()
        .filter(|row| *row > 0)
        .map(|row| row - 1)
}

/// Parses an A1-style reference ("B3", "$B$3", "b3") to zero-based (row, col) indices.
pub fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let reference = reference.replace('$', "");
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, number) = reference.split_at(split);
    Some((row_to_index(number)?, col_to_index(letters)?))
}
