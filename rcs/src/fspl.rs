use num_traits::{AsPrimitive, Float, FloatConst};

/// Speed of light in m/s
const C: usize = 299_792_458;

/// Transmitter and receiver antenna gains.
///
/// TODO: read these from the robots' antenna components once the
///       simulator exposes them.
const TX_GAIN: usize = 2;
const RX_GAIN: usize = 2;

/// Returns the wavelength (m) of a `freq_mhz` signal.
pub fn wavelength<T>(freq_mhz: T) -> T
where
    T: Float + 'static,
    usize: AsPrimitive<T>,
{
    let c: T = C.as_();
    let hz_per_mhz: T = 1_000_000usize.as_();
    c / (freq_mhz * hz_per_mhz)
}

/// Returns the free space path loss (dB) between two antennas
/// `distance_m` apart, per Friis:
///
/// ```text
/// loss = -10 * log10(Gt * Gr * λ² / (4πd)²)
/// ```
///
/// Coincident antennas (`distance_m == 0`) have a loss of `-inf`.
pub fn free_space_loss<T>(freq_mhz: T, distance_m: T) -> T
where
    T: Float + FloatConst + 'static,
    usize: AsPrimitive<T>,
{
    let wavelen = wavelength(freq_mhz);
    let gain: T = (TX_GAIN * RX_GAIN).as_();
    let four: T = 4usize.as_();
    let ten: T = 10usize.as_();
    let spread = (four * T::PI() * distance_m).powi(2);
    -ten * (gain * wavelen.powi(2) / spread).log10()
}
