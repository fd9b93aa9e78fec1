//! The ordered mangling rule table used by the `RDasMutator`.
//!
//! These are the mangling rules of Das et al. ("The Tangled Web of
//! Password Reuse", NDSS 2014) in their re-ordered form. Order is
//! significant: callers ask for the first `n` rules that yield a novel
//! variant, so entries must never be re-sorted.

use super::Rule::{self, *};

/// Number of rules in [`RDAS_RULES`].
pub const RDAS_RULE_COUNT: usize = 323;

pub static RDAS_RULES: [Rule; RDAS_RULE_COUNT] = [
  Capitalize(0),
  Delete(-1),
  Delete(-2),
  Delete(-3),
  Insert(-1, "0"),
  Insert(0, "1"),
  Insert(-1, "a"),
  Insert(-1, "q"),
  Insert(0, "0"),
  Delete(1),
  Insert(0, "a"),
  Insert(0, "5"),
  Insert(0, "123"),
  Delete(2),
  Insert(0, "2"),
  Insert(0, "7"),
  Insert(-1, "z"),
  Insert(0, "9"),
  Delete(3),
  Insert(-1, "00"),
  Insert(0, "6"),
  Insert(0, "3"),
  Insert(0, "8"),
  Insert(0, "11"),
  Insert(0, "4"),
  Insert(-1, "w"),
  Insert(0, "b"),
  Insert(0, "q"),
  Insert(0, "00"),
  Insert(0, "99"),
  Insert(0, "12"),
  Insert(0, "s"),
  Insert(0, "98"),
  Insert(-1, "1"),
  Insert(-1, "s"),
  Insert(0, "78"),
  Insert(-1, "l"),
  Insert(0, "p"),
  Insert(0, "89"),
  Insert(0, "000"),
  Insert(0, "90"),
  Insert(0, "z"),
  Insert(0, "10"),
  Insert(0, "23"),
  Insert(0, "01"),
  Insert(0, "m"),
  Insert(0, "r"),
  Insert(-1, "x"),
  Insert(-1, "000"),
  Insert(0, "k"),
  Insert(0, "e"),
  Insert(0, "22"),
  Insert(0, "f"),
  Insert(0, "n"),
  Insert(0, "88"),
  Insert(0, "w"),
  Insert(-1, "19"),
  Insert(-1, "c"),
  Insert(0, "13"),
  Insert(-1, "m"),
  Insert(-1, "p"),
  Insert(0, "456"),
  Insert(0, "21"),
  Insert(-1, "y"),
  Insert(0, "777"),
  Insert(0, "d"),
  Insert(-1, "b"),
  Insert(-1, "10"),
  Substitute("0", "o"),
  Insert(0, "08"),
  Insert(0, "07"),
  Insert(-1, "g"),
  Insert(0, "007"),
  Insert(-1, "d"),
  Insert(0, "y"),
  Insert(-1, "h"),
  Insert(0, "77"),
  Insert(0, "t"),
  Insert(-1, "k"),
  Insert(0, "55"),
  Insert(-1, "f"),
  Insert(0, "09"),
  Insert(0, "c"),
  Insert(0, "A"),
  Insert(0, "56"),
  Insert(0, "j"),
  Insert(0, "v"),
  Insert(0, "45"),
  Insert(0, "67"),
  Insert(0, "i"),
  Substitute("o", "0"),
  Insert(0, "001"),
  Insert(-1, "A"),
  Insert(-1, "t"),
  Insert(0, "101"),
  Insert(0, "l"),
  Insert(-1, "01"),
  Insert(0, "92"),
  Insert(-1, "r"),
  Insert(0, "g"),
  Insert(0, "02"),
  Insert(-1, "n"),
  Insert(0, "91"),
  Insert(0, "o"),
  Insert(-1, "3"),
  Insert(0, "h"),
  Insert(0, "321"),
  Insert(0, "95"),
  Insert(-1, "123"),
  Insert(0, "33"),
  Insert(0, "x"),
  Insert(0, "85"),
  Insert(0, "17"),
  Insert(0, "06"),
  Insert(0, "66"),
  Insert(-1, "j"),
  Insert(0, "19"),
  Insert(0, "05"),
  Insert(0, "03"),
  Insert(0, "666"),
  Insert(0, "24"),
  Insert(0, "69"),
  Insert(0, "u"),
  Insert(0, "16"),
  Insert(0, "80"),
  Insert(0, "Q"),
  Insert(0, "87"),
  Insert(0, "79"),
  Insert(0, "86"),
  Insert(0, "93"),
  Insert(0, "96"),
  Insert(-1, "e"),
  Insert(0, "65"),
  Insert(0, "15"),
  Insert(0, "25"),
  Insert(-1, "7"),
  Insert(0, "44"),
  Insert(-1, "4"),
  Insert(0, "97"),
  Insert(-1, "05"),
  Insert(-1, "09"),
  Insert(-1, "8"),
  Insert(-1, "2"),
  Insert(0, "83"),
  Insert(0, "57"),
  Insert(0, "50"),
  Insert(0, "94"),
  Insert(0, "54"),
  Insert(-1, "11"),
  Insert(-1, "08"),
  Insert(0, "61"),
  Insert(0, "20"),
  Insert(0, "14"),
  Insert(-1, "v"),
  Insert(0, "81"),
  Insert(0, "74"),
  Insert(-1, "5"),
  Insert(0, "76"),
  Insert(0, "34"),
  Insert(0, "18"),
  Insert(0, "82"),
  Insert(0, "41"),
  Insert(0, "04"),
  Insert(0, "K"),
  Insert(-1, "06"),
  Insert(0, "S"),
  Insert(0, "V"),
  Insert(-1, "007"),
  Insert(0, "75"),
  Insert(-1, "02"),
  Insert(-1, "9"),
  Insert(0, "28"),
  Insert(0, "53"),
  Substitute("asdf", "1234"),
  Substitute("1234", "asdf"),
  Insert(0, "N"),
  Insert(0, "84"),
  Insert(-1, "20"),
  Insert(0, "27"),
  Insert(-1, "Q"),
  Insert(-1, "13"),
  Insert(0, "D"),
  Insert(0, "J"),
  Insert(0, "26"),
  Insert(0, "52"),
  Insert(0, "29"),
  Insert(0, "30"),
  Insert(0, "49"),
  Insert(0, "58"),
  Insert(-1, "07"),
  Insert(0, "38"),
  Insert(-1, "Z"),
  Insert(0, "31"),
  Insert(-1, "o"),
  Insert(0, "72"),
  Insert(0, "63"),
  Insert(0, "420"),
  Substitute("3", "e"),
  Insert(0, "P"),
  Insert(-1, "04"),
  Insert(0, "32"),
  Insert(-1, "85"),
  Insert(0, "R"),
  Insert(0, "47"),
  Insert(-1, "16"),
  Insert(-1, "i"),
  Insert(0, "71"),
  Insert(0, "51"),
  Insert(-1, "12"),
  Insert(-1, "22"),
  Insert(-1, "87"),
  Insert(0, "man"),
  Insert(0, "73"),
  Insert(0, "46"),
  Insert(0, "35"),
  Insert(0, "L"),
  Insert(0, "59"),
  Insert(-1, "98"),
  Insert(0, "68"),
  Insert(-1, "32"),
  Insert(0, "60"),
  Insert(-1, "K"),
  Insert(0, "42"),
  Insert(-1, "27"),
  Insert(0, "36"),
  Insert(-1, "H"),
  Insert(0, "64"),
  Insert(0, "G"),
  Substitute("e", "3"),
  Insert(-1, "101"),
  Insert(-1, "u"),
  Insert(0, "Z"),
  Insert(0, "B"),
  Insert(0, "39"),
  Insert(0, "boy"),
  Insert(-1, "P"),
  Insert(0, "E"),
  Insert(-1, "79"),
  Insert(-1, "28"),
  Insert(0, "O"),
  Insert(-1, "30"),
  Insert(-1, "L"),
  Insert(-1, "69"),
  Insert(-1, "D"),
  Insert(-1, "31"),
  Insert(-1, "52"),
  Insert(-1, "456"),
  Substitute("qwer", "1234"),
  Substitute("5678", "qwer"),
  Insert(-1, "70"),
  Substitute("qwer", "5678"),
  Insert(-1, "41"),
  Insert(-1, "S"),
  Insert(0, "F"),
  Insert(0, "C"),
  Insert(-1, "15"),
  Substitute("qwe", "qaz"),
  Substitute("qaz", "qwe"),
  Insert(-1, "18"),
  Insert(-1, "36"),
  Insert(-1, "66"),
  Insert(-1, "53"),
  Insert(-1, "W"),
  Insert(-1, "89"),
  Insert(0, "48"),
  Insert(-1, "I"),
  Insert(-1, "17"),
  Insert(0, "40"),
  Insert(-1, "O"),
  Insert(-1, "82"),
  Insert(-1, "77"),
  Insert(0, "X"),
  Insert(-1, "94"),
  Insert(-1, "45"),
  Insert(-1, "51"),
  Insert(-1, "50"),
  Insert(0, "ita"),
  Insert(0, "W"),
  Insert(-1, "65"),
  Insert(-1, "14"),
  Insert(-1, "93"),
  Insert(-1, "21"),
  Substitute("1234", "qwer"),
  Insert(-1, "R"),
  Insert(-1, "T"),
  Insert(-1, "25"),
  Insert(-1, "143"),
  Substitute("5678", "1234"),
  Insert(-1, "60"),
  Insert(-1, "V"),
  Insert(-1, "man"),
  Insert(-1, "38"),
  Insert(-1, "86"),
  Insert(-1, "46"),
  Insert(-1, "92"),
  Insert(-1, "G"),
  Insert(-1, "54"),
  Insert(0, "M"),
  Insert(0, "70"),
  Insert(0, "089"),
  Insert(-1, "68"),
  Insert(0, "62"),
  Insert(-1, "78"),
  Insert(0, "Y"),
  Insert(-1, "62"),
  Insert(-1, "40"),
  Insert(-1, "C"),
  Insert(0, "H"),
  Insert(-1, "B"),
  Insert(-1, "X"),
  Insert(-1, "26"),
  Insert(0, "T"),
  Substitute("wsx", "2wsx"),
  Substitute("2wsx", "wsx"),
  Insert(0, "37"),
  Insert(-1, "03"),
  Insert(-1, "J"),
  Insert(-1, "55"),
  Insert(-1, "49"),
  Insert(-1, "34"),
  Substitute("zxcv", "asdf"),
  Substitute("asdf", "zxcv"),
  Insert(-1, "N"),
];
