pub const NUCLEOTIDES: [char; 4] = ['A', 'T', 'G', 'C'];

pub const INS_LABEL: &str = "INS";
pub const DEL_LABEL: &str = "DEL";
pub const SNP_LABEL: &str = "SNP";

pub const DEFAULT_DEPTH_TOOL: &str = "samtools";
pub const DEFAULT_INDEL_LENGTHS: &[u32] = &[1, 2, 3, 4, 5];
