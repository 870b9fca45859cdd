use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("posebridge {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: posebridge");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("POSEBRIDGE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "frame: {} bytes ({} per eye)",
        posebridge_frame::FRAME_SIZE,
        posebridge_frame::EYE_RECORD_SIZE
    );
    println!(
        "default_endpoint: {}",
        posebridge_transport::default_endpoint_path().display()
    );
    println!(
        "features: supervisor={}, async={}, cli=true",
        cfg!(feature = "supervisor"),
        cfg!(feature = "async")
    );

    Ok(SUCCESS)
}
