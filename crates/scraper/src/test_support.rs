// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use time::{Date, Month, OffsetDateTime, macros::datetime};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use votewatch_persistence::{Election, Persistence};

pub const STATE_CSV: &str = "\
Race,Candidate,Party,Votes,PercentageOfTotalVotes,JurisdictionName
Washington - President,John Smith,(Prefers Democratic Party),1000,45.2,
Washington - President,Jane Roe,(Prefers Republican Party),1212,54.8,
";

pub const STATE_CSV_UPDATED: &str = "\
Race,Candidate,Party,Votes,PercentageOfTotalVotes,JurisdictionName
Washington - President,John Smith,(Prefers Democratic Party),1050,46.0,
Washington - President,Jane Roe,(Prefers Republican Party),1232,54.0,
";

pub const COUNTY_CSV: &str = "\
District Name,Ballot Title,Ballot Response,Party Preference,Votes,Percent of Votes
King County,Proposition 1,Approved,,5000,60.0
King County,Proposition 1,Rejected,,3333,40.0
";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn create_test_election(persistence: &mut Persistence) -> Election {
    let date: Date = Date::from_calendar_date(2024, Month::November, 5).unwrap();
    persistence
        .find_or_create_election("2024 General Election", date)
        .expect("Failed to create election")
}

pub fn create_test_timestamp(minutes: i64) -> OffsetDateTime {
    datetime!(2024-11-06 04:00 UTC) + time::Duration::minutes(minutes)
}

/// Serves a single HTTP response on a random local port and returns its URL.
pub async fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
    let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: std::net::SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request: Vec<u8> = vec![0; 4096];
        let _ = stream.read(&mut request).await.unwrap();

        let head: String = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).await.unwrap();
        stream.write_all(&body).await.unwrap();
        stream.shutdown().await.unwrap();
    });

    format!("http://{addr}/results.csv")
}

/// Returns a URL on a local port that nothing listens on.
pub async fn closed_port_url() -> String {
    let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: std::net::SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/results.csv")
}
