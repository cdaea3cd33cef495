use k40kit::{emulator_server, Config, RecordingInterpreter, StatusReport};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

fn config_from_toml(text: &str) -> Config {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("k40kit.toml");
    std::fs::write(&path, text).unwrap();
    Config::load_from_file(&path).unwrap()
}

#[test]
fn test_config_flips_reach_emulator() {
    let config = config_from_toml("[emulator]\nflip_y = 1.0\nbanner = \"\"\n");
    let server = emulator_server(&config, RecordingInterpreter::new());

    assert_eq!(server.pending_reply(), None);
    assert_eq!(server.relay(b"G1 X1 Y2\n").as_deref(), Some("ok\r\n"));

    let status = server.relay(b"?").unwrap();
    let report = StatusReport::parse(&status).unwrap();
    assert_eq!(report.state, "Idle");
    assert!((report.mpos.0 - 1.0).abs() < 1e-9);
    assert!((report.mpos.1 - 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_banner_sent_on_connect() {
    let server = emulator_server(&Config::default(), RecordingInterpreter::new());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    let handle = tokio::spawn(async move { server.serve(listener, rx).await });

    let mut client = TcpStream::connect(addr).await.unwrap();
    let mut buf = [0u8; 128];
    let n = client.read(&mut buf).await.unwrap();
    assert_eq!(&buf[..n], b"Grbl 1.1e ['$' for help]\r\n");

    client.write_all(b"G28\n").await.unwrap();
    let n = client.read(&mut buf).await.unwrap();
    assert_eq!(&buf[..n], b"ok\r\n");

    drop(client);
    tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}
