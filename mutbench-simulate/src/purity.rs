/// Fraction of tumor reads to keep so that a sample of purity `purity` and
/// ploidy `ploidy` is diluted down to purity `purity_new`:
///
/// `purity_new * (1 - purity + ploidy * purity / 2) / (purity * (1 - purity_new + ploidy * purity_new / 2))`
///
/// No validation is done; a zero denominator yields NaN or infinity.
pub fn purity_to_fraction(purity_new: f64, purity: f64, ploidy: u32) -> f64 {
    let ploidy = ploidy as f64;
    let numerator = purity_new * (1.0 - purity + ploidy * purity / 2.0);
    let denominator = purity * (1.0 - purity_new + ploidy * purity_new / 2.0);
    numerator / denominator
}
