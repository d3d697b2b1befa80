use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn leaddesk(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("leaddesk").expect("binary builds");
    cmd.env_remove("LEADDESK_DATA_DIR");
    cmd.arg("--data-dir").arg(dir.path());
    cmd
}

fn add_lead(dir: &TempDir, name: &str, email: &str) -> String {
    let output = leaddesk(dir)
        .args(["lead", "add", "--name", name, "--email", email])
        .output()
        .expect("command runs");
    assert!(output.status.success(), "lead add failed: {output:?}");
    extract_id(&output.stdout)
}

fn extract_id(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .find(|line| line.starts_with("Added lead"))
        .expect("added line");
    let (_, tail) = line.rsplit_once('(').expect("id suffix");
    tail.strip_suffix(')').expect("closing paren").to_string()
}

fn add_follow_up(dir: &TempDir, lead_id: &str, notes: &str) -> String {
    let output = leaddesk(dir)
        .args(["followup", "add", "--lead", lead_id, "--notes", notes])
        .output()
        .expect("command runs");
    assert!(output.status.success(), "followup add failed: {output:?}");
    let text = String::from_utf8_lossy(&output.stdout);
    let line = text
        .lines()
        .find(|line| line.starts_with("Added follow-up"))
        .expect("added line");
    line.rsplit(' ').next().expect("id token").to_string()
}

#[test]
fn added_leads_show_up_in_the_list() {
    let dir = TempDir::new().expect("tempdir");

    leaddesk(&dir)
        .args([
            "lead",
            "add",
            "--name",
            "Ada Lovelace",
            "--email",
            "Ada@Example.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added lead Ada Lovelace"));

    leaddesk(&dir)
        .args(["lead", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ada@example.com"))
        .stdout(predicate::str::contains("Showing 1 - 1 of 1"));
}

#[test]
fn duplicate_emails_are_rejected() {
    let dir = TempDir::new().expect("tempdir");
    add_lead(&dir, "Ada", "ada@example.com");

    leaddesk(&dir)
        .args(["lead", "add", "--name", "Imposter", "--email", "ADA@EXAMPLE.COM"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A lead with this email already exists",
        ));

    leaddesk(&dir)
        .args(["lead", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 1 - 1 of 1"));
}

#[test]
fn list_queries_match_name_or_email() {
    let dir = TempDir::new().expect("tempdir");
    add_lead(&dir, "Ada Lovelace", "ada@example.com");
    add_lead(&dir, "Grace Hopper", "grace@navy.mil");

    leaddesk(&dir)
        .args(["lead", "list", "grace"])
        .assert()
        .success()
        .stdout(predicate::str::contains("grace@navy.mil"))
        .stdout(predicate::str::contains("Showing 1 - 1 of 1"));
}

#[test]
fn update_and_remove_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let id = add_lead(&dir, "Ada", "ada@example.com");

    leaddesk(&dir)
        .args([
            "lead",
            "update",
            id.as_str(),
            "--name",
            "Ada Lovelace",
            "--email",
            "ada@example.com",
            "--status",
            "qualified",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated lead Ada Lovelace"));

    leaddesk(&dir)
        .args(["lead", "remove", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Removed lead {id}")));

    leaddesk(&dir)
        .args(["lead", "remove", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No lead matched id"));
}

#[test]
fn follow_ups_require_a_known_lead() {
    let dir = TempDir::new().expect("tempdir");

    leaddesk(&dir)
        .args(["followup", "add", "--lead", "ghost", "--notes", "call"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no lead found with id ghost"));
}

#[test]
fn follow_ups_stay_editable_after_their_lead_is_removed() {
    let dir = TempDir::new().expect("tempdir");
    let lead_id = add_lead(&dir, "Ada", "ada@example.com");
    let follow_up_id = add_follow_up(&dir, lead_id.as_str(), "call");

    leaddesk(&dir)
        .args(["lead", "remove", lead_id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed lead"));

    leaddesk(&dir)
        .args([
            "followup",
            "update",
            follow_up_id.as_str(),
            "--lead",
            lead_id.as_str(),
            "--notes",
            "still relevant",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Updated follow-up {follow_up_id}"
        )));

    leaddesk(&dir)
        .args(["followup", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown Lead"))
        .stdout(predicate::str::contains("still relevant"));
}

#[test]
fn follow_up_window_honors_the_today_flag() {
    let dir = TempDir::new().expect("tempdir");
    let id = add_lead(&dir, "Ada", "ada@example.com");

    leaddesk(&dir)
        .args([
            "followup",
            "add",
            "--lead",
            id.as_str(),
            "--date",
            "2024-06-12",
            "--notes",
            "renewal call",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added follow-up"));

    leaddesk(&dir)
        .args(["followup", "list", "--today", "2024-06-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("renewal call"))
        .stdout(predicate::str::contains("Ada"));

    leaddesk(&dir)
        .args(["followup", "list", "--today", "2024-06-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No follow-ups yet"));

    leaddesk(&dir)
        .args(["followup", "list", "--all", "--today", "2024-06-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("renewal call"));
}

#[test]
fn dashboard_reports_counts_and_upcoming_work() {
    let dir = TempDir::new().expect("tempdir");
    let id = add_lead(&dir, "Ada", "ada@example.com");

    leaddesk(&dir)
        .args([
            "followup",
            "add",
            "--lead",
            id.as_str(),
            "--date",
            "2024-06-12",
            "--notes",
            "renewal call",
        ])
        .assert()
        .success();

    leaddesk(&dir)
        .args(["dashboard", "--today", "2024-06-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Leads: 1"))
        .stdout(predicate::str::contains("Pending Follow-ups: 1"))
        .stdout(predicate::str::contains("New: 1"))
        .stdout(predicate::str::contains("renewal call"));
}

#[test]
fn json_listing_exposes_the_page_envelope() {
    let dir = TempDir::new().expect("tempdir");
    add_lead(&dir, "Ada", "ada@example.com");

    leaddesk(&dir)
        .args(["lead", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pageCount\": 1"))
        .stdout(predicate::str::contains("\"total\": 1"));
}

#[test]
fn data_dir_env_var_selects_the_backend() {
    let dir = TempDir::new().expect("tempdir");

    let mut cmd = Command::cargo_bin("leaddesk").expect("binary builds");
    cmd.env("LEADDESK_DATA_DIR", dir.path());
    cmd.args(["lead", "add", "--name", "Ada", "--email", "ada@example.com"]);
    cmd.assert().success();

    assert!(dir.path().join("leads.json").exists());
}
