//! Parameter layout of the x42 parametric EQ (fil4) and its placement on the surface.
//!
//! ```text
//! Strip | MUTE             | REC             | Knob 1  | Knob 2 | Fader
//! ------+------------------+-----------------+---------+--------+------------
//!   1   | Highpass enable  | Plugin enable   | HP freq | HP Q   | Output gain
//!   2   | Lowpass enable   | Reset peak hold | LP freq | LP Q   | -
//!   3   | Lowshelf enable  | -               | freq    | Q      | gain
//!  4-7  | Section 1-4      | -               | freq    | Q      | gain
//!   8   | Highshelf enable | -               | freq    | Q      | gain
//! ```

use crate::param::ParamRange;
use crate::PhysicalStrip;

const GAIN_DB: ParamRange = ParamRange::linear(-18.0, 18.0);
const FILTER_Q: ParamRange = ParamRange::linear(0.0, 1.4);
const SECTION_Q: ParamRange = ParamRange::log(0.0625, 4.0);

/// The six shelving/peaking sections, each with enable/freq/Q/gain ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqSection {
    Lowshelf,
    Section1,
    Section2,
    Section3,
    Section4,
    Highshelf,
}

impl EqSection {
    pub const ALL: [EqSection; 6] = [
        EqSection::Lowshelf,
        EqSection::Section1,
        EqSection::Section2,
        EqSection::Section3,
        EqSection::Section4,
        EqSection::Highshelf,
    ];

    /// Port index of the section's enable toggle; freq, Q and gain follow it.
    fn base_index(self) -> i32 {
        match self {
            EqSection::Lowshelf => 11,
            EqSection::Section1 => 15,
            EqSection::Section2 => 19,
            EqSection::Section3 => 23,
            EqSection::Section4 => 27,
            EqSection::Highshelf => 31,
        }
    }

    fn freq_range(self) -> ParamRange {
        match self {
            EqSection::Lowshelf => ParamRange::log(25.0, 400.0),
            EqSection::Section1 => ParamRange::log(20.0, 2000.0),
            EqSection::Section2 => ParamRange::log(40.0, 4000.0),
            EqSection::Section3 => ParamRange::log(100.0, 10000.0),
            EqSection::Section4 => ParamRange::log(200.0, 20000.0),
            EqSection::Highshelf => ParamRange::log(1000.0, 16000.0),
        }
    }

    /// Name the plugin descriptor reports for the enable port.
    fn label(self) -> &'static str {
        match self {
            EqSection::Lowshelf => "Lowshelf",
            EqSection::Section1 => "Section 1",
            EqSection::Section2 => "Section 2",
            EqSection::Section3 => "Section 3",
            EqSection::Section4 => "Section 4",
            EqSection::Highshelf => "Highshelf",
        }
    }
}

/// A controllable port of the EQ plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqParam {
    Enable,
    OutputGain,
    ResetPeakHold,
    HighpassEnable,
    HighpassFreq,
    HighpassQ,
    LowpassEnable,
    LowpassFreq,
    LowpassQ,
    SectionEnable(EqSection),
    SectionFreq(EqSection),
    SectionQ(EqSection),
    SectionGain(EqSection),
}

/// How a port reacts to the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EqParamKind {
    /// On/off, flipped on each press.
    Toggle,
    /// 1 while the button is held, 0 on release.
    Momentary,
    Continuous(ParamRange),
}

impl EqParam {
    /// Plugin port index used in `/strip/plugin/parameter`.
    pub fn index(self) -> i32 {
        match self {
            EqParam::Enable => 1,
            EqParam::OutputGain => 2,
            EqParam::ResetPeakHold => 4,
            EqParam::HighpassEnable => 5,
            EqParam::HighpassFreq => 6,
            EqParam::HighpassQ => 7,
            EqParam::LowpassEnable => 8,
            EqParam::LowpassFreq => 9,
            EqParam::LowpassQ => 10,
            EqParam::SectionEnable(s) => s.base_index(),
            EqParam::SectionFreq(s) => s.base_index() + 1,
            EqParam::SectionQ(s) => s.base_index() + 2,
            EqParam::SectionGain(s) => s.base_index() + 3,
        }
    }

    pub fn kind(self) -> EqParamKind {
        match self {
            EqParam::Enable
            | EqParam::HighpassEnable
            | EqParam::LowpassEnable
            | EqParam::SectionEnable(_) => EqParamKind::Toggle,
            EqParam::ResetPeakHold => EqParamKind::Momentary,
            EqParam::OutputGain | EqParam::SectionGain(_) => EqParamKind::Continuous(GAIN_DB),
            EqParam::HighpassFreq => EqParamKind::Continuous(ParamRange::log(5.0, 1250.0)),
            EqParam::LowpassFreq => EqParamKind::Continuous(ParamRange::log(500.0, 20000.0)),
            EqParam::HighpassQ | EqParam::LowpassQ => EqParamKind::Continuous(FILTER_Q),
            EqParam::SectionFreq(s) => EqParamKind::Continuous(s.freq_range()),
            EqParam::SectionQ(_) => EqParamKind::Continuous(SECTION_Q),
        }
    }

    /// Look up a port by its index, for descriptor replies.
    pub fn from_index(index: i32) -> Option<EqParam> {
        match index {
            1 => Some(EqParam::Enable),
            2 => Some(EqParam::OutputGain),
            4 => Some(EqParam::ResetPeakHold),
            5 => Some(EqParam::HighpassEnable),
            6 => Some(EqParam::HighpassFreq),
            7 => Some(EqParam::HighpassQ),
            8 => Some(EqParam::LowpassEnable),
            9 => Some(EqParam::LowpassFreq),
            10 => Some(EqParam::LowpassQ),
            _ => EqSection::ALL.into_iter().find_map(|s| {
                match index - s.base_index() {
                    0 => Some(EqParam::SectionEnable(s)),
                    1 => Some(EqParam::SectionFreq(s)),
                    2 => Some(EqParam::SectionQ(s)),
                    3 => Some(EqParam::SectionGain(s)),
                    _ => None,
                }
            }),
        }
    }

    /// Look up a toggle port by the name the plugin descriptor reports.
    pub fn from_toggle_name(name: &str) -> Option<EqParam> {
        match name {
            "Enable" => Some(EqParam::Enable),
            "Reset Peak Hold" => Some(EqParam::ResetPeakHold),
            "Highpass" => Some(EqParam::HighpassEnable),
            "Lowpass" => Some(EqParam::LowpassEnable),
            _ => EqSection::ALL
                .into_iter()
                .find(|s| s.label() == name)
                .map(EqParam::SectionEnable),
        }
    }
}

/// The EQ ports one physical strip drives in EQ mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EqRow {
    pub mute: EqParam,
    pub rec: Option<EqParam>,
    pub knob_top: EqParam,
    pub knob_middle: EqParam,
    pub fader: Option<EqParam>,
}

pub fn eq_row(strip: PhysicalStrip) -> EqRow {
    let section = |s: EqSection| EqRow {
        mute: EqParam::SectionEnable(s),
        rec: None,
        knob_top: EqParam::SectionFreq(s),
        knob_middle: EqParam::SectionQ(s),
        fader: Some(EqParam::SectionGain(s)),
    };
    match strip.get() {
        0 => EqRow {
            mute: EqParam::HighpassEnable,
            rec: Some(EqParam::Enable),
            knob_top: EqParam::HighpassFreq,
            knob_middle: EqParam::HighpassQ,
            fader: Some(EqParam::OutputGain),
        },
        1 => EqRow {
            mute: EqParam::LowpassEnable,
            rec: Some(EqParam::ResetPeakHold),
            knob_top: EqParam::LowpassFreq,
            knob_middle: EqParam::LowpassQ,
            fader: None,
        },
        2 => section(EqSection::Lowshelf),
        3 => section(EqSection::Section1),
        4 => section(EqSection::Section2),
        5 => section(EqSection::Section3),
        6 => section(EqSection::Section4),
        _ => section(EqSection::Highshelf),
    }
}
