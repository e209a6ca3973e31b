// @generated by wattshell-gen. Do not edit by hand.
pub static PROPERTY_MAP: &[(&str, &str)] = &[
    ("absoluteMaxCurrent", "ama"),
    ("accessState", "acs"),
    ("allowCharging", "alw"),
    ("amperage1", "i1"),
    ("amperage2", "i2"),
    ("amperage3", "i3"),
    ("cableCurrentLimit", "cbl"),
    ("cableLock", "ust"),
    ("carState", "car"),
    ("chargeDuration", "cdi"),
    ("chargingCurrent", "amp"),
    ("chargingEnergy", "wh"),
    ("energyCounterTotal", "eto"),
    ("errorState", "err"),
    ("firmwareVersion", "fwv"),
    ("frequency", "fhz"),
    ("heartbeat", "hbt"),
    ("ledBrightness", "lbr"),
    ("lockSettings", "lck"),
    ("phaseSwitchMode", "psm"),
    ("power", "nrg"),
    ("serialNumber", "sse"),
    ("temperature", "tma"),
    ("volt", "vol"),
    ("voltage1", "u1"),
    ("voltage2", "u2"),
    ("voltage3", "u3"),
];
