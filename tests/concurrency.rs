use chrono::NaiveDate;
use futures::future::join_all;
use registry_api::api::{self, AppState};
use registry_api::config::{self, Service};
use registry_api::db;
use registry_api::model::NewEmployee;
use serde_json::Value;
use tokio::net::TcpListener;

async fn serve(service: Service, pool: db::Pool) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = api::router(service, AppState::new(pool));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn concurrent_reads_do_not_interfere() {
    let td = tempfile::tempdir().unwrap();
    let cfg = config::Database {
        url: format!("sqlite://{}/registry.db", td.path().display()),
        max_connections: 4,
        migrate: true,
    };
    let pool = db::init_pool(&cfg).await.unwrap();
    db::run_migrations(&pool).await.unwrap();

    let mut ids = Vec::new();
    {
        let mut conn = pool.acquire().await.unwrap();
        for n in 0..12 {
            let employee = NewEmployee {
                first_name: format!("Worker{n}"),
                last_name: "Concurrent".into(),
                email: format!("worker{n}@example.com"),
                phone_number: None,
                hire_date: NaiveDate::from_ymd_opt(2023, 1, 1 + n).unwrap(),
                job_id: "ST_CLERK".into(),
                salary: 2500.0 + f64::from(n),
                manager_id: None,
                department_id: 50,
            };
            ids.push((n, db::insert_employee(&mut conn, &employee).await.unwrap()));
        }
    }

    let base = serve(Service::Employees, pool).await;
    let client = reqwest::Client::new();

    let responses = join_all(ids.iter().map(|(n, id)| {
        let client = client.clone();
        let url = format!("{base}/employees/{id}");
        async move {
            let resp = client.get(url).send().await.unwrap();
            assert_eq!(resp.status(), reqwest::StatusCode::OK);
            assert_eq!(
                resp.headers()["access-control-allow-origin"],
                "*"
            );
            (*n, *id, resp.json::<Value>().await.unwrap())
        }
    }))
    .await;

    for (n, id, row) in responses {
        assert_eq!(row["employee_id"].as_i64(), Some(id));
        assert_eq!(row["first_name"], format!("Worker{n}"));
        assert_eq!(row["hire_date"], format!("2023-01-{:02}", 1 + n));
    }
}

#[tokio::test]
async fn preflight_over_the_wire() {
    let td = tempfile::tempdir().unwrap();
    let cfg = config::Database {
        url: format!("sqlite://{}/transit.db", td.path().display()),
        max_connections: 2,
        migrate: true,
    };
    let pool = db::init_pool(&cfg).await.unwrap();
    db::run_migrations(&pool).await.unwrap();

    let base = serve(Service::Transit, pool).await;
    let resp = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{base}/bookings"))
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(resp.headers()["access-control-allow-headers"], "Content-Type");
    assert!(resp.bytes().await.unwrap().is_empty());
}
