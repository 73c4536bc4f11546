//! End-to-end scenarios driven against a minimal fake server.

mod common;

use std::net::TcpListener;
use std::thread;

use common::FakeServer;
use h2_client::opts::ConnectionInfo;
use h2_client::value::Value;
use h2_client::Client;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn connect_info(port: u16) -> ConnectionInfo {
    ConnectionInfo {
        host: "127.0.0.1".to_string(),
        port,
        database: "test".to_string(),
        user: "sa".to_string(),
        password: "sa".to_string(),
        ..ConnectionInfo::default()
    }
}

#[test]
fn handshake_then_select_one() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let mut server = FakeServer::accept(&listener);
        server.accept_handshake();

        // PREPARE "SELECT 1"
        assert_eq!(server.read_i32(), 0); // Command::Prepare
        let _stmt_id = server.read_i32();
        assert_eq!(server.read_string(), "SELECT 1");
        server.write_i32(1); // Status::Ok
        server.write_bool(true); // is_query
        server.write_bool(true); // is_read_only
        server.write_i32(0); // num_params
        server.flush();

        // EXEC_QUERY
        assert_eq!(server.read_i32(), 2); // Command::ExecuteQuery
        let _stmt_id = server.read_i32();
        let _object_id = server.read_i32();
        let _max_rows = server.read_i32();
        let _fetch_size = server.read_i32();
        let _flags = server.read_i32();
        server.write_i32(1); // Status::Ok
        server.write_i32(1); // column_count
        server.write_i32(1); // row_count
        server.write_string(""); // alias
        server.write_string(""); // schema
        server.write_string(""); // table
        server.write_string("1"); // column name
        server.write_i32(4); // value type: Int
        server.write_i64(0); // precision
        server.write_i32(0); // scale
        server.write_i32(0); // display size
        server.write_bool(false); // autoincrement
        server.write_i32(0); // nullable
        server.flush();

        // first row
        server.write_bool(true); // has_next
        server.write_i32(4); // Kind::Int
        server.write_i32(1); // value
        server.flush();

        // RESULT_CLOSE
        assert_eq!(server.read_i32(), 7);
        let _object_id = server.read_i32();
        server.write_i32(1);
        server.flush();

        // CMD_CLOSE
        assert_eq!(server.read_i32(), 4);
        let _stmt_id = server.read_i32();
        server.write_i32(1);
        server.flush();
    });

    let mut client = Client::connect(connect_info(addr.port())).unwrap();
    let mut stmt = client.prepare("SELECT 1").unwrap();
    let mut rows = client.execute_query(&mut stmt).unwrap();
    assert_eq!(rows.columns(), ["1"]);
    let row = rows.next_row(&mut client).unwrap().unwrap();
    assert_eq!(row, vec![Value::Int(1)]);
    assert!(rows.next_row(&mut client).unwrap().is_none());
    rows.close(&mut client).unwrap();
    client.close_statement(&stmt).unwrap();

    server.join().unwrap();
}

#[test]
fn server_error_does_not_break_framing() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let mut server = FakeServer::accept(&listener);
        server.accept_handshake();

        // PREPARE "BOGUS SQL"
        assert_eq!(server.read_i32(), 0);
        let _stmt_id = server.read_i32();
        assert_eq!(server.read_string(), "BOGUS SQL");
        server.write_i32(0); // Status::Error
        server.write_string("42S02");
        server.write_string("Table not found");
        server.write_string("BOGUS SQL");
        server.write_i32(42_102);
        server.write_string("at line 1");
        server.flush();

        // PREPARE "SELECT 1" (connection must still be usable)
        assert_eq!(server.read_i32(), 0);
        let _stmt_id = server.read_i32();
        assert_eq!(server.read_string(), "SELECT 1");
        server.write_i32(1);
        server.write_bool(true);
        server.write_bool(true);
        server.write_i32(0);
        server.flush();
    });

    let mut client = Client::connect(connect_info(addr.port())).unwrap();

    let err = client.prepare("BOGUS SQL").unwrap_err();
    match err {
        h2_client::Error::Server(server_err) => {
            assert_eq!(server_err.code_name, "42S02");
            assert_eq!(server_err.code_numeric, 42_102);
        }
        other => panic!("expected a server error, got {other:?}"),
    }

    let stmt = client.prepare("SELECT 1").unwrap();
    assert!(stmt.is_query);

    server.join().unwrap();
}

#[test]
fn transaction_rollback_restores_autocommit() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let mut server = FakeServer::accept(&listener);
        server.accept_handshake();

        // PREPARE_PARAMS2 "SET AUTOCOMMIT FALSE"
        assert_eq!(server.read_i32(), 18);
        let _stmt_id = server.read_i32();
        assert_eq!(server.read_string(), "SET AUTOCOMMIT FALSE");
        server.write_i32(1);
        server.write_bool(false); // is_query
        server.write_bool(false); // is_read_only
        server.write_i32(0); // num_params
        server.write_i32(0); // command type
        server.flush();

        // EXEC_UPDATE (SET AUTOCOMMIT FALSE)
        assert_eq!(server.read_i32(), 3);
        let _stmt_id = server.read_i32();
        assert_eq!(server.read_i32(), 0);
        let _generated_keys_mode = server.read_i32();
        server.write_i32(1);
        server.write_i32(0);
        server.write_bool(false);
        server.flush();

        // CMD_CLOSE for the SET AUTOCOMMIT FALSE statement
        assert_eq!(server.read_i32(), 4);
        let _stmt_id = server.read_i32();
        server.write_i32(1);
        server.flush();

        // PREPARE_PARAMS2 "INSERT INTO t VALUES (1)"
        assert_eq!(server.read_i32(), 18);
        let _stmt_id = server.read_i32();
        let _sql = server.read_string();
        server.write_i32(1);
        server.write_bool(false); // is_query
        server.write_bool(false); // is_read_only
        server.write_i32(0); // num_params
        server.write_i32(0); // command type
        server.flush();

        // EXEC_UPDATE
        assert_eq!(server.read_i32(), 3);
        let _stmt_id = server.read_i32();
        let num_params = server.read_i32();
        assert_eq!(num_params, 0);
        let _generated_keys_mode = server.read_i32();
        server.write_i32(1);
        server.write_i32(1); // rows updated
        server.write_bool(false); // autocommit echo
        server.flush();

        // PREPARE_PARAMS2 "ROLLBACK"
        assert_eq!(server.read_i32(), 18);
        let _stmt_id = server.read_i32();
        assert_eq!(server.read_string(), "ROLLBACK");
        server.write_i32(1);
        server.write_bool(false);
        server.write_bool(false);
        server.write_i32(0);
        server.write_i32(0);
        server.flush();

        // EXEC_UPDATE (ROLLBACK)
        assert_eq!(server.read_i32(), 3);
        let _stmt_id = server.read_i32();
        assert_eq!(server.read_i32(), 0);
        let _generated_keys_mode = server.read_i32();
        server.write_i32(1);
        server.write_i32(0);
        server.write_bool(false);
        server.flush();

        // CMD_CLOSE for the ROLLBACK statement
        assert_eq!(server.read_i32(), 4);
        let _stmt_id = server.read_i32();
        server.write_i32(1);
        server.flush();

        // PREPARE_PARAMS2 "SET AUTOCOMMIT TRUE"
        assert_eq!(server.read_i32(), 18);
        let _stmt_id = server.read_i32();
        assert_eq!(server.read_string(), "SET AUTOCOMMIT TRUE");
        server.write_i32(1);
        server.write_bool(false);
        server.write_bool(false);
        server.write_i32(0);
        server.write_i32(0);
        server.flush();

        // EXEC_UPDATE (SET AUTOCOMMIT TRUE)
        assert_eq!(server.read_i32(), 3);
        let _stmt_id = server.read_i32();
        assert_eq!(server.read_i32(), 0);
        let _generated_keys_mode = server.read_i32();
        server.write_i32(1);
        server.write_i32(0);
        server.write_bool(false);
        server.flush();

        // CMD_CLOSE for the SET AUTOCOMMIT TRUE statement
        assert_eq!(server.read_i32(), 4);
        let _stmt_id = server.read_i32();
        server.write_i32(1);
        server.flush();
    });

    let mut client = Client::connect(connect_info(addr.port())).unwrap();
    let tx = client.begin().unwrap();
    let stmt = client.prepare_params("INSERT INTO t VALUES (1)").unwrap();
    let affected = client.execute_update(&stmt, &[]).unwrap();
    assert_eq!(affected, 1);
    tx.rollback(&mut client).unwrap();

    server.join().unwrap();
}
