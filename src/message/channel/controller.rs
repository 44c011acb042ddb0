use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Named controller numbers for Control Change messages.
///
/// Controllers `0x78..=0x7F` are channel mode messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Controller {
    BankSelect = 0x00,
    ModulationWheel = 0x01,
    BreathController = 0x02,
    FootController = 0x04,
    PortamentoTime = 0x05,
    DataEntry = 0x06,
    ChannelVolume = 0x07,
    Balance = 0x08,
    Pan = 0x0A,
    Expression = 0x0B,
    EffectControl1 = 0x0C,
    EffectControl2 = 0x0D,
    GeneralPurpose1 = 0x10,
    GeneralPurpose2 = 0x11,
    GeneralPurpose3 = 0x12,
    GeneralPurpose4 = 0x13,
    BankSelectLsb = 0x20,
    ModulationWheelLsb = 0x21,
    BreathControllerLsb = 0x22,
    FootControllerLsb = 0x24,
    PortamentoTimeLsb = 0x25,
    DataEntryLsb = 0x26,
    ChannelVolumeLsb = 0x27,
    BalanceLsb = 0x28,
    PanLsb = 0x2A,
    ExpressionLsb = 0x2B,
    EffectControl1Lsb = 0x2C,
    EffectControl2Lsb = 0x2D,
    GeneralPurpose1Lsb = 0x30,
    GeneralPurpose2Lsb = 0x31,
    GeneralPurpose3Lsb = 0x32,
    GeneralPurpose4Lsb = 0x33,
    DamperPedal = 0x40,
    Portamento = 0x41,
    Sostenuto = 0x42,
    SoftPedal = 0x43,
    LegatoFootswitch = 0x44,
    Hold2 = 0x45,
    SoundVariation = 0x46,
    Timbre = 0x47,
    ReleaseTime = 0x48,
    AttackTime = 0x49,
    Brightness = 0x4A,
    SoundController6 = 0x4B,
    SoundController7 = 0x4C,
    SoundController8 = 0x4D,
    SoundController9 = 0x4E,
    SoundController10 = 0x4F,
    GeneralPurpose5 = 0x50,
    GeneralPurpose6 = 0x51,
    GeneralPurpose7 = 0x52,
    GeneralPurpose8 = 0x53,
    PortamentoControl = 0x54,
    ReverbDepth = 0x5B,
    TremoloDepth = 0x5C,
    ChorusDepth = 0x5D,
    DetuneDepth = 0x5E,
    PhaserDepth = 0x5F,
    DataIncrement = 0x60,
    DataDecrement = 0x61,
    NonRegisteredParameterLsb = 0x62,
    NonRegisteredParameterMsb = 0x63,
    RegisteredParameterLsb = 0x64,
    RegisteredParameterMsb = 0x65,
    AllSoundOff = 0x78,
    ResetAllControllers = 0x79,
    LocalControl = 0x7A,
    AllNotesOff = 0x7B,
    OmniModeOff = 0x7C,
    OmniModeOn = 0x7D,
    MonoModeOn = 0x7E,
    PolyModeOn = 0x7F,
}

impl Controller {
    /// True for the channel mode controllers (120-127)
    pub fn is_channel_mode(&self) -> bool {
        u8::from(*self) >= 0x78
    }
}
