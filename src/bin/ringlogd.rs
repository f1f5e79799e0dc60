use log::{LevelFilter, error, info};
use ringlog::{
    Result,
    server::{Server, ServerConfig},
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let daemon_mode = std::env::args().nth(1).as_deref() == Some("-d");

    if let Err(e) = syslog::init(syslog::Facility::LOG_USER, LevelFilter::Debug, None) {
        eprintln!("ringlogd: syslog unavailable: {e}");
    }

    match serve(daemon_mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("fatal: {e}");
            eprintln!("ringlogd: {e}");
            ExitCode::FAILURE
        }
    }
}

fn serve(daemon_mode: bool) -> Result<()> {
    let server = Server::new(ServerConfig::default())?;

    // Bind before daemonizing so a port conflict fails in the foreground
    // with exit code 1.
    let listener = server.bind()?;

    if daemon_mode {
        daemonize()?;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        info!("serving");
        server.run(listener).await
    })
}

/// Detaches the process: fork (the parent exits 0), new session, root
/// working directory, stdio redirected to `/dev/null`.
fn daemonize() -> Result<()> {
    use nix::unistd::{ForkResult, dup2, fork, setsid};
    use std::os::fd::AsRawFd;

    match unsafe { fork() }.map_err(errno_to_io)? {
        ForkResult::Parent { .. } => std::process::exit(0),
        ForkResult::Child => {}
    }

    setsid().map_err(errno_to_io)?;
    std::env::set_current_dir("/")?;

    let dev_null = std::fs::File::options()
        .read(true)
        .write(true)
        .open("/dev/null")?;
    for fd in 0..=2 {
        dup2(dev_null.as_raw_fd(), fd).map_err(errno_to_io)?;
    }

    Ok(())
}

fn errno_to_io(errno: nix::errno::Errno) -> std::io::Error {
    std::io::Error::from_raw_os_error(errno as i32)
}
