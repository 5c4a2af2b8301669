use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::normalize_key;

/// Pharmacological class of an antibiotic. Allergy labels and tissue
/// penetration tables are expressed in terms of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DrugClass {
    Penicillin,
    Cephalosporin,
    Monobactam,
    Carbapenem,
    Aminoglycoside,
    Fluoroquinolone,
    FolatePathwayInhibitor,
    Glycopeptide,
    Lipopeptide,
    Oxazolidinone,
    Lincosamide,
    Macrolide,
    Tetracycline,
    Nitrofuran,
    Phosphonic,
    Nitroimidazole,
    Rifamycin,
    Polymyxin,
    Streptogramin,
}

impl DrugClass {
    /// The cross-reactive beta-lactam family: penicillins, cephalosporins and
    /// carbapenems. Monobactams are not included.
    pub fn is_beta_lactam(self) -> bool {
        matches!(self, Self::Penicillin | Self::Cephalosporin | Self::Carbapenem)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Penicillin => "penicillin",
            Self::Cephalosporin => "cephalosporin",
            Self::Monobactam => "monobactam",
            Self::Carbapenem => "carbapenem",
            Self::Aminoglycoside => "aminoglycoside",
            Self::Fluoroquinolone => "fluoroquinolone",
            Self::FolatePathwayInhibitor => "folate pathway inhibitor",
            Self::Glycopeptide => "glycopeptide",
            Self::Lipopeptide => "lipopeptide",
            Self::Oxazolidinone => "oxazolidinone",
            Self::Lincosamide => "lincosamide",
            Self::Macrolide => "macrolide",
            Self::Tetracycline => "tetracycline",
            Self::Nitrofuran => "nitrofuran",
            Self::Phosphonic => "phosphonic acid",
            Self::Nitroimidazole => "nitroimidazole",
            Self::Rifamycin => "rifamycin",
            Self::Polymyxin => "polymyxin",
            Self::Streptogramin => "streptogramin",
        }
    }

    /// Resolve a class label as written on an allergy list
    /// ("penicillins", "sulfa", "quinolones", ...).
    pub fn from_label(label: &str) -> Option<Self> {
        let key = normalize_key(label, '_');
        let class = match key.as_str() {
            "penicillin" | "penicillins" | "aminopenicillin" | "aminopenicillins" => Self::Penicillin,
            "cephalosporin" | "cephalosporins" | "cephem" | "cephems" => Self::Cephalosporin,
            "monobactam" | "monobactams" => Self::Monobactam,
            "carbapenem" | "carbapenems" | "penem" | "penems" => Self::Carbapenem,
            "aminoglycoside" | "aminoglycosides" => Self::Aminoglycoside,
            "fluoroquinolone" | "fluoroquinolones" | "quinolone" | "quinolones" => {
                Self::Fluoroquinolone
            }
            "sulfa" | "sulfonamide" | "sulfonamides" | "sulpha" | "folate_pathway_inhibitor"
            | "folate_pathway_inhibitors" => Self::FolatePathwayInhibitor,
            "glycopeptide" | "glycopeptides" => Self::Glycopeptide,
            "lipopeptide" | "lipopeptides" => Self::Lipopeptide,
            "oxazolidinone" | "oxazolidinones" => Self::Oxazolidinone,
            "lincosamide" | "lincosamides" => Self::Lincosamide,
            "macrolide" | "macrolides" => Self::Macrolide,
            "tetracycline" | "tetracyclines" | "glycylcycline" | "glycylcyclines" => {
                Self::Tetracycline
            }
            "nitrofuran" | "nitrofurans" => Self::Nitrofuran,
            "phosphonic" | "phosphonic_acid" | "phosphonic_acids" => Self::Phosphonic,
            "nitroimidazole" | "nitroimidazoles" => Self::Nitroimidazole,
            "rifamycin" | "rifamycins" => Self::Rifamycin,
            "polymyxin" | "polymyxins" => Self::Polymyxin,
            "streptogramin" | "streptogramins" => Self::Streptogramin,
            _ => return None,
        };
        Some(class)
    }
}

impl fmt::Display for DrugClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every antibiotic the engine knows. Knowledge-base entries, susceptibility
/// results and regimen drugs are all keyed by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Antibiotic {
    Penicillin,
    Ampicillin,
    AmoxicillinClavulanate,
    AmpicillinSulbactam,
    PiperacillinTazobactam,
    Oxacillin,
    Cefazolin,
    Cefoxitin,
    Cefuroxime,
    Ceftriaxone,
    Cefotaxime,
    Ceftazidime,
    Cefpodoxime,
    Cefepime,
    Ceftaroline,
    CeftazidimeAvibactam,
    CeftolozaneTazobactam,
    Aztreonam,
    Ertapenem,
    Imipenem,
    Meropenem,
    MeropenemVaborbactam,
    Gentamicin,
    Tobramycin,
    Amikacin,
    Ciprofloxacin,
    Levofloxacin,
    Moxifloxacin,
    TrimethoprimSulfamethoxazole,
    Vancomycin,
    Daptomycin,
    Linezolid,
    Clindamycin,
    Erythromycin,
    Azithromycin,
    Doxycycline,
    Minocycline,
    Tigecycline,
    Nitrofurantoin,
    Fosfomycin,
    Metronidazole,
    Rifampin,
    Colistin,
    QuinupristinDalfopristin,
}

impl Antibiotic {
    pub const ALL: [Antibiotic; 44] = [
        Self::Penicillin,
        Self::Ampicillin,
        Self::AmoxicillinClavulanate,
        Self::AmpicillinSulbactam,
        Self::PiperacillinTazobactam,
        Self::Oxacillin,
        Self::Cefazolin,
        Self::Cefoxitin,
        Self::Cefuroxime,
        Self::Ceftriaxone,
        Self::Cefotaxime,
        Self::Ceftazidime,
        Self::Cefpodoxime,
        Self::Cefepime,
        Self::Ceftaroline,
        Self::CeftazidimeAvibactam,
        Self::CeftolozaneTazobactam,
        Self::Aztreonam,
        Self::Ertapenem,
        Self::Imipenem,
        Self::Meropenem,
        Self::MeropenemVaborbactam,
        Self::Gentamicin,
        Self::Tobramycin,
        Self::Amikacin,
        Self::Ciprofloxacin,
        Self::Levofloxacin,
        Self::Moxifloxacin,
        Self::TrimethoprimSulfamethoxazole,
        Self::Vancomycin,
        Self::Daptomycin,
        Self::Linezolid,
        Self::Clindamycin,
        Self::Erythromycin,
        Self::Azithromycin,
        Self::Doxycycline,
        Self::Minocycline,
        Self::Tigecycline,
        Self::Nitrofurantoin,
        Self::Fosfomycin,
        Self::Metronidazole,
        Self::Rifampin,
        Self::Colistin,
        Self::QuinupristinDalfopristin,
    ];

    /// Canonical name, identical to the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            Self::Penicillin => "penicillin",
            Self::Ampicillin => "ampicillin",
            Self::AmoxicillinClavulanate => "amoxicillin-clavulanate",
            Self::AmpicillinSulbactam => "ampicillin-sulbactam",
            Self::PiperacillinTazobactam => "piperacillin-tazobactam",
            Self::Oxacillin => "oxacillin",
            Self::Cefazolin => "cefazolin",
            Self::Cefoxitin => "cefoxitin",
            Self::Cefuroxime => "cefuroxime",
            Self::Ceftriaxone => "ceftriaxone",
            Self::Cefotaxime => "cefotaxime",
            Self::Ceftazidime => "ceftazidime",
            Self::Cefpodoxime => "cefpodoxime",
            Self::Cefepime => "cefepime",
            Self::Ceftaroline => "ceftaroline",
            Self::CeftazidimeAvibactam => "ceftazidime-avibactam",
            Self::CeftolozaneTazobactam => "ceftolozane-tazobactam",
            Self::Aztreonam => "aztreonam",
            Self::Ertapenem => "ertapenem",
            Self::Imipenem => "imipenem",
            Self::Meropenem => "meropenem",
            Self::MeropenemVaborbactam => "meropenem-vaborbactam",
            Self::Gentamicin => "gentamicin",
            Self::Tobramycin => "tobramycin",
            Self::Amikacin => "amikacin",
            Self::Ciprofloxacin => "ciprofloxacin",
            Self::Levofloxacin => "levofloxacin",
            Self::Moxifloxacin => "moxifloxacin",
            Self::TrimethoprimSulfamethoxazole => "trimethoprim-sulfamethoxazole",
            Self::Vancomycin => "vancomycin",
            Self::Daptomycin => "daptomycin",
            Self::Linezolid => "linezolid",
            Self::Clindamycin => "clindamycin",
            Self::Erythromycin => "erythromycin",
            Self::Azithromycin => "azithromycin",
            Self::Doxycycline => "doxycycline",
            Self::Minocycline => "minocycline",
            Self::Tigecycline => "tigecycline",
            Self::Nitrofurantoin => "nitrofurantoin",
            Self::Fosfomycin => "fosfomycin",
            Self::Metronidazole => "metronidazole",
            Self::Rifampin => "rifampin",
            Self::Colistin => "colistin",
            Self::QuinupristinDalfopristin => "quinupristin-dalfopristin",
        }
    }

    pub fn class(self) -> DrugClass {
        use DrugClass::*;
        match self {
            Self::Penicillin
            | Self::Ampicillin
            | Self::AmoxicillinClavulanate
            | Self::AmpicillinSulbactam
            | Self::PiperacillinTazobactam
            | Self::Oxacillin => Penicillin,
            Self::Cefazolin
            | Self::Cefoxitin
            | Self::Cefuroxime
            | Self::Ceftriaxone
            | Self::Cefotaxime
            | Self::Ceftazidime
            | Self::Cefpodoxime
            | Self::Cefepime
            | Self::Ceftaroline
            | Self::CeftazidimeAvibactam
            | Self::CeftolozaneTazobactam => Cephalosporin,
            Self::Aztreonam => Monobactam,
            Self::Ertapenem | Self::Imipenem | Self::Meropenem | Self::MeropenemVaborbactam => {
                Carbapenem
            }
            Self::Gentamicin | Self::Tobramycin | Self::Amikacin => Aminoglycoside,
            Self::Ciprofloxacin | Self::Levofloxacin | Self::Moxifloxacin => Fluoroquinolone,
            Self::TrimethoprimSulfamethoxazole => FolatePathwayInhibitor,
            Self::Vancomycin => Glycopeptide,
            Self::Daptomycin => Lipopeptide,
            Self::Linezolid => Oxazolidinone,
            Self::Clindamycin => Lincosamide,
            Self::Erythromycin | Self::Azithromycin => Macrolide,
            Self::Doxycycline | Self::Minocycline | Self::Tigecycline => Tetracycline,
            Self::Nitrofurantoin => Nitrofuran,
            Self::Fosfomycin => Phosphonic,
            Self::Metronidazole => Nitroimidazole,
            Self::Rifampin => Rifamycin,
            Self::Colistin => Polymyxin,
            Self::QuinupristinDalfopristin => Streptogramin,
        }
    }

    /// Resolve a free-form antibiotic name: canonical names in any case or
    /// separator style first, then the abbreviation/alias table.
    pub fn resolve(raw: &str) -> Option<Self> {
        let key = normalize_key(raw, '-');
        if key.is_empty() {
            return None;
        }
        if let Some(found) = Self::ALL.iter().find(|a| a.name() == key) {
            return Some(*found);
        }
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, antibiotic)| *antibiotic)
    }
}

/// Abbreviations and trade-style spellings, already in normalized form.
const ALIASES: &[(&str, Antibiotic)] = &[
    ("pen", Antibiotic::Penicillin),
    ("penicillin-g", Antibiotic::Penicillin),
    ("benzylpenicillin", Antibiotic::Penicillin),
    ("amp", Antibiotic::Ampicillin),
    ("amox-clav", Antibiotic::AmoxicillinClavulanate),
    ("amoxicillin-clavulanic-acid", Antibiotic::AmoxicillinClavulanate),
    ("co-amoxiclav", Antibiotic::AmoxicillinClavulanate),
    ("augmentin", Antibiotic::AmoxicillinClavulanate),
    ("amp-sulb", Antibiotic::AmpicillinSulbactam),
    ("unasyn", Antibiotic::AmpicillinSulbactam),
    ("pip-tazo", Antibiotic::PiperacillinTazobactam),
    ("piptazo", Antibiotic::PiperacillinTazobactam),
    ("tzp", Antibiotic::PiperacillinTazobactam),
    ("zosyn", Antibiotic::PiperacillinTazobactam),
    ("ox", Antibiotic::Oxacillin),
    ("cefazoline", Antibiotic::Cefazolin),
    ("fox", Antibiotic::Cefoxitin),
    ("cro", Antibiotic::Ceftriaxone),
    ("ctx", Antibiotic::Cefotaxime),
    ("caz", Antibiotic::Ceftazidime),
    ("fep", Antibiotic::Cefepime),
    ("caz-avi", Antibiotic::CeftazidimeAvibactam),
    ("avycaz", Antibiotic::CeftazidimeAvibactam),
    ("c-t", Antibiotic::CeftolozaneTazobactam),
    ("zerbaxa", Antibiotic::CeftolozaneTazobactam),
    ("atm", Antibiotic::Aztreonam),
    ("etp", Antibiotic::Ertapenem),
    ("ipm", Antibiotic::Imipenem),
    ("imipenem-cilastatin", Antibiotic::Imipenem),
    ("mem", Antibiotic::Meropenem),
    ("mero", Antibiotic::Meropenem),
    ("mev", Antibiotic::MeropenemVaborbactam),
    ("vabomere", Antibiotic::MeropenemVaborbactam),
    ("gent", Antibiotic::Gentamicin),
    ("gm", Antibiotic::Gentamicin),
    ("tobra", Antibiotic::Tobramycin),
    ("amk", Antibiotic::Amikacin),
    ("cipro", Antibiotic::Ciprofloxacin),
    ("cip", Antibiotic::Ciprofloxacin),
    ("levo", Antibiotic::Levofloxacin),
    ("lvx", Antibiotic::Levofloxacin),
    ("moxi", Antibiotic::Moxifloxacin),
    ("tmp-smx", Antibiotic::TrimethoprimSulfamethoxazole),
    ("sxt", Antibiotic::TrimethoprimSulfamethoxazole),
    ("co-trimoxazole", Antibiotic::TrimethoprimSulfamethoxazole),
    ("cotrimoxazole", Antibiotic::TrimethoprimSulfamethoxazole),
    ("bactrim", Antibiotic::TrimethoprimSulfamethoxazole),
    ("trimethoprim-sulfa", Antibiotic::TrimethoprimSulfamethoxazole),
    ("vanc", Antibiotic::Vancomycin),
    ("vanco", Antibiotic::Vancomycin),
    ("dap", Antibiotic::Daptomycin),
    ("lzd", Antibiotic::Linezolid),
    ("clinda", Antibiotic::Clindamycin),
    ("ery", Antibiotic::Erythromycin),
    ("azithro", Antibiotic::Azithromycin),
    ("doxy", Antibiotic::Doxycycline),
    ("mino", Antibiotic::Minocycline),
    ("tgc", Antibiotic::Tigecycline),
    ("nitro", Antibiotic::Nitrofurantoin),
    ("macrobid", Antibiotic::Nitrofurantoin),
    ("fos", Antibiotic::Fosfomycin),
    ("flagyl", Antibiotic::Metronidazole),
    ("rifampicin", Antibiotic::Rifampin),
    ("polymyxin-e", Antibiotic::Colistin),
    ("synercid", Antibiotic::QuinupristinDalfopristin),
];

impl fmt::Display for Antibiotic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Antibiotic {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s).ok_or_else(|| CoreError::UnknownAntibiotic(s.to_string()))
    }
}
