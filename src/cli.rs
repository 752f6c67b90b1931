use clap::Parser;
use ihdathi::coords::{Direction, UtmZone};

use crate::utils::version;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    #[arg(
        short,
        long,
        value_name = "FLOAT",
        help = "Tick rate, i.e. number of ticks per second",
        default_value_t = 1.0
    )]
    pub tick_rate: f64,

    #[arg(
        short,
        long,
        value_name = "FLOAT",
        help = "Frame rate, i.e. number of frames per second",
        default_value_t = 4.0
    )]
    pub frame_rate: f64,

    #[arg(
        short,
        long,
        value_name = "DIRECTION",
        help = "Conversion shown on start: utm-to-geo or geo-to-utm",
        default_value_t = Direction::default()
    )]
    pub direction: Direction,

    #[arg(
        short,
        long,
        value_name = "ZONE",
        help = "UTM zone selected on start, 35 to 38",
        default_value_t = UtmZone::default()
    )]
    pub zone: UtmZone,
}
