use super::*;
use crate::error::Error;
use rust_decimal::Decimal;

// ==================== Clause composition (no database) ====================

#[test]
fn company_filter_renders_in_fixed_order() {
    let filter = CompanyFilter {
        // Construction order here is deliberately not the processing order.
        max_employees: Some(100),
        name: Some("abc".to_string()),
        min_employees: Some(5),
    };

    let clause = filter.to_where_clause();
    assert_eq!(
        clause.clause(),
        "LOWER(name) LIKE LOWER($1) AND num_employees >= $2 AND num_employees <= $3"
    );
    assert_eq!(clause.params_ref().len(), 3);
}

#[test]
fn company_filter_partial_criteria() {
    let filter = CompanyFilter {
        name: Some("abc".to_string()),
        min_employees: Some(5),
        max_employees: None,
    };

    let clause = filter.to_where_clause();
    assert_eq!(
        clause.clause(),
        "LOWER(name) LIKE LOWER($1) AND num_employees >= $2"
    );
    assert_eq!(clause.params_ref().len(), 2);
}

#[test]
fn company_filter_empty_means_unfiltered() {
    let clause = CompanyFilter::default().to_where_clause();
    assert!(clause.is_empty());
    assert_eq!(clause.clause(), "");
    assert!(clause.params_ref().is_empty());
}

#[test]
fn job_filter_renders_in_fixed_order() {
    let filter = JobFilter {
        company_handle: Some("acme".to_string()),
        has_equity: Some(true),
        title: Some("engineer".to_string()),
        min_salary: Some(90_000),
    };

    let clause = filter.to_where_clause();
    assert_eq!(
        clause.clause(),
        "LOWER(title) LIKE LOWER($1) AND salary >= $2 AND equity > 0 AND company_handle = $3"
    );
    // The equity flag binds nothing.
    assert_eq!(clause.params_ref().len(), 3);
}

#[test]
fn job_filter_equity_flag_alone() {
    let filter = JobFilter {
        has_equity: Some(true),
        ..Default::default()
    };
    let clause = filter.to_where_clause();
    assert_eq!(clause.clause(), "equity > 0");
    assert!(clause.params_ref().is_empty());

    let filter = JobFilter {
        has_equity: Some(false),
        ..Default::default()
    };
    let clause = filter.to_where_clause();
    assert_eq!(clause.clause(), "equity = 0");
    assert!(clause.params_ref().is_empty());
}

#[test]
fn job_filter_empty_means_unfiltered() {
    let clause = JobFilter::default().to_where_clause();
    assert!(clause.is_empty());
    assert_eq!(clause.clause(), "");
}

#[test]
fn company_patch_resolves_external_names() {
    let patch = CompanyPatch {
        num_employees: Some(12),
        logo_url: Some("http://logo".to_string()),
        ..Default::default()
    };

    let set = patch.into_update().into_set_clause().unwrap();
    assert_eq!(set.to_sql(), r#""num_employees"=$1, "logo_url"=$2"#);
    assert_eq!(set.params_ref().len(), 2);
}

#[test]
fn empty_company_patch_is_bad_request() {
    let err = CompanyPatch::default()
        .into_update()
        .into_set_clause()
        .unwrap_err();
    assert!(err.is_bad_request());
}

#[test]
fn empty_job_patch_is_bad_request() {
    let err = JobPatch::default().into_update().into_set_clause().unwrap_err();
    assert!(err.is_bad_request());
}

#[test]
fn filter_deserializes_camel_case() {
    let filter: JobFilter =
        serde_json::from_str(r#"{"minSalary": 10, "hasEquity": true, "companyHandle": "acme"}"#)
            .unwrap();
    assert_eq!(filter.min_salary, Some(10));
    assert_eq!(filter.has_equity, Some(true));
    assert_eq!(filter.company_handle.as_deref(), Some("acme"));
    assert!(filter.title.is_none());
}

#[test]
fn company_serializes_camel_case() {
    let company = Company {
        handle: "acme".to_string(),
        name: "Acme".to_string(),
        description: "Anvils".to_string(),
        num_employees: Some(3),
        logo_url: None,
    };
    let json = serde_json::to_value(&company).unwrap();
    assert_eq!(json["numEmployees"], 3);
    assert!(json.get("logoUrl").is_some());
    assert!(json.get("num_employees").is_none());
}

// ==================== Database round trips ====================
//
// These run only when DATABASE_URL is set. Tables are created TEMP, so each
// test's connection sees its own private schema.

async fn try_connect() -> Option<tokio_postgres::Client> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

async fn connect_with_schema() -> Option<tokio_postgres::Client> {
    let client = try_connect().await?;
    client
        .batch_execute(
            "CREATE TEMP TABLE companies (
                 handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
                 name TEXT UNIQUE NOT NULL,
                 description TEXT NOT NULL,
                 num_employees INTEGER CHECK (num_employees >= 0),
                 logo_url TEXT
             );
             CREATE TEMP TABLE jobs (
                 id SERIAL PRIMARY KEY,
                 title TEXT NOT NULL,
                 salary INTEGER CHECK (salary >= 0),
                 equity NUMERIC CHECK (equity <= 1.0),
                 company_handle VARCHAR(25) NOT NULL
                     REFERENCES companies ON DELETE CASCADE,
                 UNIQUE (title, company_handle)
             );",
        )
        .await
        .expect("failed to create temp schema");
    Some(client)
}

fn acme() -> NewCompany {
    NewCompany {
        handle: "acme".to_string(),
        name: "Acme".to_string(),
        description: "Anvils and more".to_string(),
        num_employees: Some(40),
        logo_url: None,
    }
}

#[tokio::test]
async fn company_create_get_roundtrip() {
    let Some(client) = connect_with_schema().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let created = Company::create(&client, acme()).await.unwrap();
    assert_eq!(created.handle, "acme");
    assert_eq!(created.num_employees, Some(40));

    let fetched = Company::get(&client, "acme").await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn company_create_duplicate_is_conflict() {
    let Some(client) = connect_with_schema().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    Company::create(&client, acme()).await.unwrap();
    let err = Company::create(&client, acme()).await.unwrap_err();
    assert!(err.is_conflict(), "expected Conflict, got {err:?}");
}

#[tokio::test]
async fn company_get_missing_is_not_found() {
    let Some(client) = connect_with_schema().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let err = Company::get(&client, "nope").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn company_list_filters_and_orders() {
    let Some(client) = connect_with_schema().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    for (handle, name, size) in [
        ("zeta", "Zeta Works", 5),
        ("acme", "Acme", 40),
        ("anvil", "Anvil & Sons", 12),
    ] {
        Company::create(
            &client,
            NewCompany {
                handle: handle.to_string(),
                name: name.to_string(),
                description: "d".to_string(),
                num_employees: Some(size),
                logo_url: None,
            },
        )
        .await
        .unwrap();
    }

    // Unfiltered, ordered by name.
    let all = Company::list(&client, &CompanyFilter::default()).await.unwrap();
    let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Acme", "Anvil & Sons", "Zeta Works"]);

    // Case-insensitive substring.
    let filter = CompanyFilter {
        name: Some("aN".to_string()),
        ..Default::default()
    };
    let matched = Company::list(&client, &filter).await.unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].handle, "anvil");

    // Range bounds combine.
    let filter = CompanyFilter {
        min_employees: Some(10),
        max_employees: Some(50),
        ..Default::default()
    };
    let matched = Company::list(&client, &filter).await.unwrap();
    let handles: Vec<&str> = matched.iter().map(|c| c.handle.as_str()).collect();
    assert_eq!(handles, ["acme", "anvil"]);

    // Zero matches is an empty list, not an error.
    let filter = CompanyFilter {
        min_employees: Some(1_000),
        ..Default::default()
    };
    let matched = Company::list(&client, &filter).await.unwrap();
    assert!(matched.is_empty());
}

#[tokio::test]
async fn company_partial_update_touches_only_given_fields() {
    let Some(client) = connect_with_schema().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    Company::create(&client, acme()).await.unwrap();

    let patch = CompanyPatch {
        num_employees: Some(41),
        ..Default::default()
    };
    let updated = Company::update(&client, "acme", patch).await.unwrap();
    assert_eq!(updated.num_employees, Some(41));
    assert_eq!(updated.name, "Acme");
    assert_eq!(updated.description, "Anvils and more");
}

#[tokio::test]
async fn company_update_missing_is_not_found() {
    let Some(client) = connect_with_schema().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let patch = CompanyPatch {
        name: Some("New Name".to_string()),
        ..Default::default()
    };
    let err = Company::update(&client, "nope", patch).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn company_remove_deletes_row() {
    let Some(client) = connect_with_schema().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    Company::create(&client, acme()).await.unwrap();
    Company::remove(&client, "acme").await.unwrap();
    assert!(Company::get(&client, "acme").await.unwrap_err().is_not_found());

    let err = Company::remove(&client, "acme").await.unwrap_err();
    assert!(err.is_not_found());
}

async fn seed_jobs(client: &tokio_postgres::Client) {
    Company::create(client, acme()).await.unwrap();
    for (title, salary, equity) in [
        ("Engineer", Some(120_000), Some(Decimal::new(5, 2))),
        ("Accountant", Some(80_000), Some(Decimal::ZERO)),
        ("Intern", Some(30_000), None),
    ] {
        Job::create(
            client,
            NewJob {
                title: title.to_string(),
                salary,
                equity,
                company_handle: "acme".to_string(),
            },
        )
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn job_create_get_roundtrip() {
    let Some(client) = connect_with_schema().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    Company::create(&client, acme()).await.unwrap();
    let created = Job::create(
        &client,
        NewJob {
            title: "Engineer".to_string(),
            salary: Some(120_000),
            equity: Some(Decimal::new(5, 2)),
            company_handle: "acme".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(created.equity, Some(Decimal::new(5, 2)));

    let fetched = Job::get(&client, created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn job_create_unknown_company_is_foreign_key_error() {
    let Some(client) = connect_with_schema().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let err = Job::create(
        &client,
        NewJob {
            title: "Engineer".to_string(),
            salary: None,
            equity: None,
            company_handle: "ghost".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::ForeignKey(_)), "got {err:?}");
}

#[tokio::test]
async fn job_list_equity_flag() {
    let Some(client) = connect_with_schema().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    seed_jobs(&client).await;

    let with_equity = Job::list(
        &client,
        &JobFilter {
            has_equity: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let titles: Vec<&str> = with_equity.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, ["Engineer"]);

    let without_equity = Job::list(
        &client,
        &JobFilter {
            has_equity: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let titles: Vec<&str> = without_equity.iter().map(|j| j.title.as_str()).collect();
    // NULL equity matches neither side of the flag.
    assert_eq!(titles, ["Accountant"]);
}

#[tokio::test]
async fn job_list_combined_filters() {
    let Some(client) = connect_with_schema().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    seed_jobs(&client).await;

    let filter = JobFilter {
        title: Some("eNgIn".to_string()),
        min_salary: Some(100_000),
        company_handle: Some("acme".to_string()),
        ..Default::default()
    };
    let matched = Job::list(&client, &filter).await.unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].title, "Engineer");

    let filter = JobFilter {
        min_salary: Some(500_000),
        ..Default::default()
    };
    assert!(Job::list(&client, &filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn job_update_and_remove() {
    let Some(client) = connect_with_schema().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    seed_jobs(&client).await;
    let jobs = Job::list(&client, &JobFilter::default()).await.unwrap();
    let intern = jobs.iter().find(|j| j.title == "Intern").unwrap();

    let patch = JobPatch {
        salary: Some(45_000),
        ..Default::default()
    };
    let updated = Job::update(&client, intern.id, patch).await.unwrap();
    assert_eq!(updated.salary, Some(45_000));
    assert_eq!(updated.title, "Intern");

    Job::remove(&client, intern.id).await.unwrap();
    assert!(Job::get(&client, intern.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn company_detail_includes_jobs() {
    let Some(client) = connect_with_schema().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    seed_jobs(&client).await;
    let detail = Company::get_with_jobs(&client, "acme").await.unwrap();
    assert_eq!(detail.company.handle, "acme");
    let titles: Vec<&str> = detail.jobs.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, ["Accountant", "Engineer", "Intern"]);
}

#[tokio::test]
async fn operations_compose_inside_a_transaction() {
    let Some(mut client) = connect_with_schema().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let tx = client.transaction().await.unwrap();
    Company::create(&tx, acme()).await.unwrap();
    tx.rollback().await.unwrap();

    assert!(Company::get(&client, "acme").await.unwrap_err().is_not_found());
}
