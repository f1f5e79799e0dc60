use crate::{
    Error, Result,
    device::{DeviceHandle, SeekToCommand},
    journal::CommandLog,
};
use std::{io::SeekFrom, sync::Arc};

async fn handle_with(commands: &[&str]) -> Result<DeviceHandle> {
    let log = Arc::new(CommandLog::new(10));
    let mut handle = DeviceHandle::open(log);
    for command in commands {
        handle.write(command.as_bytes()).await?;
    }
    Ok(handle)
}

#[tokio::test]
async fn write_then_read_roundtrip() -> Result<()> {
    let mut handle = handle_with(&["hello\n"]).await?;

    let mut buf = [0u8; 16];
    let count = handle.read(&mut buf).await?;
    assert_eq!(b"hello\n", &buf[..count]);
    assert_eq!(6, handle.position());

    assert_eq!(0, handle.read(&mut buf).await?);

    Ok(())
}

#[tokio::test]
async fn reads_are_command_sliced() -> Result<()> {
    let mut handle = handle_with(&["aa\n", "bb\n"]).await?;

    // one command tail per call, even with room to spare in the buffer
    let mut buf = [0u8; 64];
    let count = handle.read(&mut buf).await?;
    assert_eq!(b"aa\n", &buf[..count]);
    let count = handle.read(&mut buf).await?;
    assert_eq!(b"bb\n", &buf[..count]);
    assert_eq!(0, handle.read(&mut buf).await?);

    Ok(())
}

#[tokio::test]
async fn seek_to_command_positions_cursor() -> Result<()> {
    let mut handle = handle_with(&["aa\n", "bb\n", "c\n"]).await?;

    let pos = handle
        .seek_to_command(SeekToCommand {
            command_index: 1,
            command_offset: 2,
        })
        .await?;
    assert_eq!(5, pos);

    let mut buf = [0u8; 10];
    let count = handle.read(&mut buf).await?;
    assert_eq!(b"\n", &buf[..count]);
    let count = handle.read(&mut buf).await?;
    assert_eq!(b"c\n", &buf[..count]);
    assert_eq!(0, handle.read(&mut buf).await?);

    Ok(())
}

#[tokio::test]
async fn seek_to_command_boundary_errors() -> Result<()> {
    let mut handle = handle_with(&["aa\n", "bb\n", "c\n"]).await?;

    // unoccupied slot
    assert!(matches!(
        handle
            .seek_to_command(SeekToCommand {
                command_index: 3,
                command_offset: 0,
            })
            .await,
        Err(Error::InvalidArgument(_))
    ));
    // offset at the command size (offsets 0..=2 are valid for "bb\n")
    assert!(matches!(
        handle
            .seek_to_command(SeekToCommand {
                command_index: 1,
                command_offset: 3,
            })
            .await,
        Err(Error::InvalidArgument(_))
    ));
    // index at the buffer capacity
    assert!(matches!(
        handle
            .seek_to_command(SeekToCommand {
                command_index: 10,
                command_offset: 0,
            })
            .await,
        Err(Error::InvalidArgument(_))
    ));

    // a failed seek leaves the position alone
    assert_eq!(0, handle.position());

    Ok(())
}

#[tokio::test]
async fn seek_absolute_relative_and_from_end() -> Result<()> {
    let mut handle = handle_with(&["aa\n", "bb\n", "c\n"]).await?;

    assert_eq!(3, handle.seek(SeekFrom::Start(3)).await?);
    assert_eq!(5, handle.seek(SeekFrom::Current(2)).await?);
    assert_eq!(4, handle.seek(SeekFrom::Current(-1)).await?);
    assert_eq!(6, handle.seek(SeekFrom::End(-2)).await?);

    let mut buf = [0u8; 10];
    let count = handle.read(&mut buf).await?;
    assert_eq!(b"c\n", &buf[..count]);

    Ok(())
}

#[tokio::test]
async fn seek_below_zero_fails() -> Result<()> {
    let mut handle = handle_with(&["aa\n"]).await?;

    assert!(matches!(
        handle.seek(SeekFrom::Current(-1)).await,
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        handle.seek(SeekFrom::End(-4)).await,
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(0, handle.position());

    Ok(())
}

#[tokio::test]
async fn position_past_eof_reads_zero_until_written() -> Result<()> {
    let mut handle = handle_with(&["aa\n"]).await?;

    assert_eq!(5, handle.seek(SeekFrom::Start(5)).await?);
    let mut buf = [0u8; 10];
    assert_eq!(0, handle.read(&mut buf).await?);

    handle.write(b"bbb\n").await?;
    let count = handle.read(&mut buf).await?;
    assert_eq!(b"b\n", &buf[..count]);

    Ok(())
}

#[tokio::test]
async fn write_ignores_position() -> Result<()> {
    let mut handle = handle_with(&["aa\n"]).await?;

    handle.seek(SeekFrom::Start(0)).await?;
    handle.write(b"bb\n").await?;

    // the write appended instead of overwriting at the position
    let mut buf = [0u8; 10];
    let count = handle.read(&mut buf).await?;
    assert_eq!(b"aa\n", &buf[..count]);
    let count = handle.read(&mut buf).await?;
    assert_eq!(b"bb\n", &buf[..count]);

    Ok(())
}

#[tokio::test]
async fn handles_share_the_log_with_independent_positions() -> Result<()> {
    let log = Arc::new(CommandLog::new(10));
    let mut writer = DeviceHandle::open(log.clone());
    let mut reader = DeviceHandle::open(log.clone());

    writer.write(b"shared\n").await?;

    let mut buf = [0u8; 10];
    let count = reader.read(&mut buf).await?;
    assert_eq!(b"shared\n", &buf[..count]);

    // the writer's position is untouched by the reader's progress
    assert_eq!(0, writer.position());
    assert_eq!(7, reader.position());

    Ok(())
}
