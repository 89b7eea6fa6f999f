//! Japanese imperial eras.

use almanac_astro::fixed_from_gregorian;

use crate::era::{Era, EraCounting, EraTable};

// (name, native name, start year, month, day)
const IMPERIAL_ERAS: [(&str, &str, i32, u8, u8); 5] = [
    ("Meiji", "明治", 1868, 9, 8),
    ("Taishō", "大正", 1912, 7, 30),
    ("Shōwa", "昭和", 1926, 12, 25),
    ("Heisei", "平成", 1989, 1, 8),
    ("Reiwa", "令和", 2019, 5, 1),
];

/// The built-in Japanese eras from Meiji on. Each era's first year ends
/// on the Gregorian December 31; dates before Meiji count proleptically in
/// Meiji.
///
/// The table is appendable: push a new [`Era`] starting after Reiwa and
/// pass the table to [`Gregorian::japanese_with_eras`].
///
/// [`Gregorian::japanese_with_eras`]: super::Gregorian::japanese_with_eras
pub fn japanese_eras() -> EraTable {
    EraTable::from_ordered(
        IMPERIAL_ERAS
            .iter()
            .map(|&(name, native, year, month, day)| {
                Era::new(
                    name,
                    Some(fixed_from_gregorian(year, month, day)),
                    year,
                    EraCounting::Forward,
                )
                .with_native_name(native)
            })
            .collect(),
    )
}
