pub const PASS: &str = "PASS";

// processed call-table columns
pub const ID_COL: &str = "id";
pub const CHROMOSOME_COL: &str = "Chromosome";
pub const START_POSITION_COL: &str = "Start_Position";
pub const VARIANT_TYPE_COL: &str = "Variant_Type";
pub const TUMOR_VAF_COL: &str = "Tumor_VAF";
pub const REFERENCE_ALLELE_COL: &str = "Reference_Allele";
pub const TUMOR_ALLELE_COL: &str = "Tumor_Seq_Allele2";
pub const TARGET_FILTER_COL: &str = "target_filter";
pub const CURRENT_FILTER_COL: &str = "current_filter";
pub const NEW_FILTER_COL: &str = "new_filter";
pub const BASIC_FILTER_COL: &str = "basic";

/// Cell values read as "absent".
pub const MISSING_VALUES: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

pub const DEFAULT_TARGET_VARIANTS: &[&str] = &["SNP", "DNP", "TNP"];
pub const INSERTION_VARIANT: &str = "INS";

pub const CURRENT_FILTER_VAF_THRESHOLD: f64 = 0.05;
pub const NEW_FILTER_VAF_THRESHOLD: f64 = 0.01;

pub const REPLICATE_DELIMITER: char = '_';
pub const DEFAULT_BAND_COEFFICIENT: f64 = 0.1;
