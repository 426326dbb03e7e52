//! Static clinical lookup tables: MIMIC lab item ids grouped by panel,
//! procedure keyword lists and ICD procedure code lists.
//!
//! ICD codes are stored in the normalised form produced by
//! [`crate::procedures::normalize_icd_code`] (upper-case, no dots).

use cdm_core::models::scores::LabTestId;

use crate::procedures::AltKeywords;

// ---------------------------------------------------------------------------
// Laboratory tests
// ---------------------------------------------------------------------------

/// White blood cells (51301, 51755, 51300), C-reactive protein (50889) and
/// 51652. Required for every pathology.
pub const INFLAMMATION_LAB_TESTS: &[LabTestId] = &[51301, 51755, 51300, 50889, 51652];

pub const COMPLETE_BLOOD_COUNT: &[LabTestId] = &[
    51279, // red blood cells
    51301, 51755, 51300, // white blood cells
    51222, 50811, // hemoglobin
    51221, 51638, 50810, // hematocrit
    51250, 51248, 51249, // MCV, MCH, MCHC
    51265, // platelets
    51244, 51133, 52769, 51245, // lymphocytes
    51146, 52069, // basophils
    51200, 52073, // eosinophils
    51254, 52074, 51253, // monocytes
    51256, 52075, // neutrophils
    51277, 52172, // RDW
];

pub const BASIC_METABOLIC_PANEL: &[LabTestId] = &[
    50809, 50931, 52569, // glucose
    50824, 50983, 52623, // sodium
    50822, 50971, 52610, // potassium
    50806, 50902, 52535, // chloride
    50803, 50882, // bicarbonate
    51006, 52647, // urea nitrogen
    50912, 52024, 52546, // creatinine
    50808, 50893, 51624, // calcium
];

pub const COMPREHENSIVE_METABOLIC_PANEL: &[LabTestId] = &[
    50809, 50931, 52569, 50824, 50983, 52623, 50822, 50971, 52610, 50806, 50902, 52535, 50803,
    50882, 51006, 52647, 50912, 52024, 52546, 50808, 50893, 51624,
    50861, // ALT
    50863, // alkaline phosphatase
    50878, // AST
    50883, 50884, 50885, // bilirubin
    50976, // total protein
];

pub const BLOOD_UREA_NITROGEN: &[LabTestId] = &[51006, 52647];

pub const RENAL_FUNCTION_PANEL: &[LabTestId] = &[
    50862, // albumin
    51006, 52647, // urea nitrogen
    50824, 50983, 52623, // sodium
    50808, 50893, 51624, // calcium
    50804, 51739, // CO2
    50806, 50902, 52535, // chloride
    50912, 52024, 52546, // creatinine
    50809, 50931, 52569, // glucose
    50970, // phosphate
    50822, 50971, 52610, // potassium
];

pub const LIVER_FUNCTION_PANEL: &[LabTestId] = &[
    50861, 50878, 50863, 50927, // ALT, AST, ALP, GGT
    50883, 50884, 50885, // bilirubin
    51274, 51237, 51675, // PT / INR
    50976, 50862, // total protein, albumin
];

pub const URINALYSIS: &[LabTestId] = &[
    51508, 51506, 51512, 51108, 51498, 51994, 51093, 51069, 51070, 51082, 51106, 51097, 51100,
    51102, 51068, 51492, 51992, 51104, 51462, 51469, 51503, 51505, 51510, 51493, 51494, 51495,
    51516, 51517, 51518, 51507, 51094, 51491, 52730, 51464, 51966, 51084, 51478, 51981, 51514,
    52002, 51484, 51984, 51487, 51987, 51486, 51985, 51476, 51497, 51501, 51489, 51488,
];

pub const ELECTROLYTE_PANEL: &[LabTestId] = &[
    50824, 50983, 52623, 50822, 50971, 52610, 50806, 50902, 52535, 50803, 50882,
];

pub const LIPID_PROFILE: &[LabTestId] = &[50907, 50905, 50906, 50904, 51000];

pub const COAGULATION_PROFILE: &[LabTestId] = &[51274, 51275, 51675, 51237];

pub const IRON_STUDIES: &[LabTestId] = &[50952, 50953, 50998, 50924, 51250];

pub const LIVER_ENZYMES: &[LabTestId] = &[50861, 50878, 50863, 50927];

pub const THYROID_FUNCTION_TEST: &[LabTestId] = &[50993, 50994, 50995, 51001, 50992];

/// Every orderable panel or single test, by the name the model may use.
pub const LAB_PANELS: &[(&str, &[LabTestId])] = &[
    ("Complete Blood Count (CBC)", COMPLETE_BLOOD_COUNT),
    ("Basic Metabolic Panel (BMP)", BASIC_METABOLIC_PANEL),
    ("Comprehensive Metabolic Panel (CMP)", COMPREHENSIVE_METABOLIC_PANEL),
    ("Blood urea nitrogen (BUN)", BLOOD_UREA_NITROGEN),
    ("Renal Function Panel (RFP)", RENAL_FUNCTION_PANEL),
    ("Liver Function Panel (LFP)", LIVER_FUNCTION_PANEL),
    ("Urinalysis", URINALYSIS),
    ("Electrolyte Panel", ELECTROLYTE_PANEL),
    ("Lipid Profile", LIPID_PROFILE),
    ("Coagulation Profile", COAGULATION_PROFILE),
    ("Iron Studies", IRON_STUDIES),
    ("Liver Enzymes", LIVER_ENZYMES),
    ("Thyroid Function Test (TFT)", THYROID_FUNCTION_TEST),
    ("Gamma Glutamyltransferase (GGT)", &[50927]),
    ("Phosphorus", &[50970]),
    ("Mean Corpuscular Volume (MCV)", &[51250]),
    ("C-Reactive Protein (CRP)", &[50889]),
    ("CRP", &[50889]),
    ("Prostate Specific Antigen (PSA)", &[50974]),
    ("PSA", &[50974]),
    ("Alkaline Phosphatase (ALP)", &[50863]),
    ("ALP", &[50863]),
    ("Alk Phos", &[50863]),
    ("Pregnancy Test", &[51085, 52720]),
    ("Amylase, Serum", &[50867]),
    ("Serum Amylase", &[50867]),
    ("Stool Occult Blood", &[51460]),
    ("Erythrocyte Sedimentation Rate (ESR)", &[51288]),
    ("ESR", &[51288]),
    ("Troponin", &[51003]),
    ("Direct Bilirubin", &[50883]),
    ("TSH", &[50993]),
    ("Calcium", &[50893]),
    ("White Blood Cell Count", &[51300]),
    ("Free T4", &[50995]),
    ("Blood Culture", &[90201]),
    ("Stool Culture", &[90267]),
    ("O&P", &[90250]),
];

/// Item ids of a named panel (case-insensitive), if known.
pub fn lab_panel(name: &str) -> Option<&'static [LabTestId]> {
    LAB_PANELS
        .iter()
        .find(|(panel, _)| panel.eq_ignore_ascii_case(name.trim()))
        .map(|(_, ids)| *ids)
}

// ---------------------------------------------------------------------------
// Procedure keywords
// ---------------------------------------------------------------------------

const SURGICAL_MODIFIERS: &[&str] = &["surgery", "surgical", "removal", "remove"];

pub const APPENDECTOMY_PROCEDURES_KEYWORDS: &[&str] = &["appendectomy"];

pub const ALTERNATE_APPENDECTOMY_KEYWORDS: &[AltKeywords] =
    &[AltKeywords::new("appendix", SURGICAL_MODIFIERS)];

/// Includes the misspellings seen in discharge notes.
pub const CHOLECYSTECTOMY_PROCEDURES_KEYWORDS: &[&str] = &[
    "cholecystectomy",
    "cholecystecotmy",
    "cholecsytectomy",
    "cholecystecomy",
    "cholecytectomy",
    "laparoscopic cholecystitis",
    "cholecyctectomy",
];

pub const ALTERNATE_CHOLECYSTECTOMY_KEYWORDS: &[AltKeywords] =
    &[AltKeywords::new("gallbladder", SURGICAL_MODIFIERS)];

pub const DRAINAGE_PROCEDURES_KEYWORDS: &[&str] = &["drain", "pigtail", "catheter", "aspiration"];

pub const DRAINAGE_LOCATIONS_DIVERTICULITIS: &[&str] = &[
    "abscess",
    "abdom",
    "pelvic",
    "peritoneal",
    "pericolonic",
    "sigmoid",
    "diverticular",
    "pararectal",
];

pub const DRAINAGE_LOCATIONS_PANCREATITIS: &[&str] = &[
    "abscess",
    "abdom",
    "pelvic",
    "peritoneal",
    "pancrea",
    "gallbladder",
    "biliary",
    "bile duct",
    "perirectal",
];

/// One location + drainage-modifier pair per drainage location.
pub fn drainage_alternatives(locations: &[&'static str]) -> Vec<AltKeywords> {
    locations
        .iter()
        .copied()
        .map(|loc| AltKeywords::new(loc, DRAINAGE_PROCEDURES_KEYWORDS))
        .collect()
}

pub const COLECTOMY_PROCEDURES_KEYWORDS: &[&str] = &[
    "low anterior resection",
    "colectomy",
    "colonic resection",
    "colostomy",
    "resection of rectosigmoid colon",
    "resection of sigmoid colon",
    "rectosigmoid resection",
    "resection of colon",
    "sigmoidectomy",
    "sigmoid resection",
    "small bowel resection",
];

pub const ALTERNATE_COLECTOMY_KEYWORDS: &[AltKeywords] =
    &[AltKeywords::new("colon", SURGICAL_MODIFIERS)];

pub const ERCP_PROCEDURES_KEYWORDS: &[&str] = &[
    "biliary stent",
    "biliary cannulation",
    "ercp",
    "endoscopic retrograde cholangiography",
    "endoscopic retrograde cholangiopancreatography",
    "cholangiogram",
    "cbd stent",
    "pancreatic stent",
    "sphincterotomy",
    "sphinctertomy",
];

// ---------------------------------------------------------------------------
// ICD procedure codes
// ---------------------------------------------------------------------------

pub const APPENDECTOMY_PROCEDURES_ICD9: &[&str] = &["4701", "4709", "4711", "4719"];

pub const APPENDECTOMY_PROCEDURES_ICD10: &[&str] = &["0DTJ0ZZ", "0DTJ4ZZ", "0DTJ7ZZ", "0DTJ8ZZ"];

pub const CHOLECYSTECTOMY_PROCEDURES_ICD9: &[&str] = &["5121", "5122", "5123", "5124"];

pub const CHOLECYSTECTOMY_PROCEDURES_ICD10: &[&str] = &[
    "0FT40ZZ", "0FT44ZZ", "0FT47ZZ", "0FT48ZZ", "0FB40ZZ", "0FB44ZZ",
];

pub const COLECTOMY_PROCEDURES_ICD9: &[&str] = &[
    "1731", "1732", "1733", "1734", "1735", "1736", "1739", // laparoscopic
    "4571", "4572", "4573", "4574", "4575", "4576", "4579", // open partial
    "4581", "4582", "4583", // total
    "4603", "4610", "4611", "4613", // colostomy
    "4852", "4862", "4863", // rectosigmoid
];

pub const COLECTOMY_PROCEDURES_ICD10: &[&str] = &[
    "0DTN0ZZ", "0DTN4ZZ", "0DTN7ZZ", "0DTN8ZZ", // sigmoid
    "0DTG0ZZ", "0DTG4ZZ", // left large intestine
    "0DTF0ZZ", "0DTF4ZZ", // right large intestine
    "0DTE0ZZ", "0DTE4ZZ", // large intestine
    "0DTK0ZZ", "0DTL0ZZ", "0DTM0ZZ", "0DTP0ZZ", // colon segments, rectum
    "0DBN0ZZ", "0DBN4ZZ", // sigmoid excision
    "0D1N0Z4", "0D1M0Z4", "0D1L0Z4", // colostomy
];

pub const DRAINAGE_PROCEDURES_ICD9: &[&str] = &["5491", "5419", "5101", "5201", "524"];

/// Percutaneous drainage of peritoneal, pelvic and retroperitoneal spaces.
pub const DRAINAGE_PROCEDURES_ALL_ICD10: &[&str] = &[
    "0W9G30Z", "0W9G3ZZ", "0W9G40Z", "0W9G4ZZ", // peritoneal cavity
    "0W9J30Z", "0W9J3ZZ", // pelvic cavity
    "0W9H30Z", "0W9H3ZZ", // retroperitoneum
    "0D9N30Z", "0D9N3ZZ", // sigmoid colon
    "0F9430Z", "0F943ZZ", // gallbladder
];

pub const DRAINAGE_PROCEDURES_PANCREATITIS_ICD10: &[&str] = &[
    "0F9G30Z", "0F9G3ZZ", "0F9G40Z", "0F9G4ZZ", "0F9G80Z", "0F9G8ZZ",
];

pub const ERCP_PROCEDURES_ICD9: &[&str] = &[
    "5110", "5111", "5114", "5115", "5184", "5185", "5186", "5187", "5188", "5210", "5213",
    "5214", "5293", "5297", "5298",
];

pub const ERCP_PROCEDURES_ICD10: &[&str] = &[
    "BF100ZZ", "BF110ZZ", "0FC98ZZ", "0FC58ZZ", "0F798DZ", "0F798ZZ", "0F7D8DZ", "0F9980Z",
    "0F998ZZ", "0F8C8ZZ",
];
