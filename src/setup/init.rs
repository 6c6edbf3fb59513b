use std::error::Error;
use std::io::Read;

use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::types::{Client, ClientId, Location, RouteRequest, DEPOT_LABEL};
use crate::error::RoutingError;

/// One row of the operations CSV. The row with id `A` is the depot.
#[derive(Debug, Deserialize)]
struct OperationRow {
    operation: u64,
    id: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    demand: Option<i64>,
}

/// Reads one operation (depot plus clients) from CSV with the header
/// `operation,id,latitude,longitude,demand`.
///
/// Without an explicit operation id the first operation in the file is used.
/// Every client row must carry a demand; the depot row leaves it empty.
/// Fails with `OperationNotFound` when the operation has no rows or no depot.
pub fn read_operation<R: Read>(
    reader: R,
    operation: Option<u64>,
) -> Result<(u64, RouteRequest), Box<dyn Error>> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut selected = operation;
    let mut depot: Option<Location> = None;
    let mut clients = Vec::new();

    for row in reader.deserialize::<OperationRow>() {
        let row = row?;
        let target = *selected.get_or_insert(row.operation);
        if row.operation != target {
            continue;
        }

        let location = Location::new(row.latitude, row.longitude);
        if row.id.eq_ignore_ascii_case(DEPOT_LABEL) {
            if depot.replace(location).is_some() {
                return Err(format!("Operation {} has more than one depot row", target).into());
            }
            continue;
        }

        let id: u64 = row
            .id
            .parse()
            .map_err(|e| format!("Invalid client id '{}': {}", row.id, e))?;
        let demand = row.demand.ok_or_else(|| {
            RoutingError::invalid_client(
                ClientId(id),
                format!("operation {} row has no demand", target),
            )
        })?;
        debug!("Client {} at {} with demand {}", id, location.as_lat_lon(), demand);
        clients.push(Client::new(id, location, demand));
    }

    let Some(operation) = selected else {
        return Err("Operations CSV is empty".into());
    };
    let Some(depot) = depot else {
        return Err(RoutingError::OperationNotFound(operation).into());
    };

    info!("Loaded operation {} with {} clients", operation, clients.len());
    Ok((operation, RouteRequest { depot, clients }))
}

pub fn load_operation(
    csv_path: &str,
    operation: Option<u64>,
) -> Result<(u64, RouteRequest), Box<dyn Error>> {
    let file = std::fs::File::open(csv_path)
        .map_err(|e| format!("Failed to open operations CSV at {}: {}", csv_path, e))?;
    read_operation(file, operation)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
operation,id,latitude,longitude,demand
1,A,1.30,103.80,
1,10,1.31,103.81,30
1,11,1.32,103.82,40
2,A,1.40,103.90,
2,20,1.41,103.91,25
";

    #[test]
    fn reads_the_requested_operation() {
        let (operation, request) = read_operation(CSV.as_bytes(), Some(2)).unwrap();
        assert_eq!(operation, 2);
        assert_eq!(request.depot, Location::new(1.40, 103.90));
        assert_eq!(request.clients.len(), 1);
        assert_eq!(request.clients[0].id, ClientId(20));
        assert_eq!(request.clients[0].demand, 25);
    }

    #[test]
    fn defaults_to_first_operation() {
        let (operation, request) = read_operation(CSV.as_bytes(), None).unwrap();
        assert_eq!(operation, 1);
        let ids: Vec<ClientId> = request.clients.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![ClientId(10), ClientId(11)]);
    }

    #[test]
    fn unknown_operation_is_not_found() {
        let err = read_operation(CSV.as_bytes(), Some(9)).unwrap_err();
        let routing = err.downcast_ref::<RoutingError>().unwrap();
        assert_eq!(routing, &RoutingError::OperationNotFound(9));
    }

    #[test]
    fn bad_client_id_is_rejected() {
        let csv = "operation,id,latitude,longitude,demand\n1,A,0,0,\n1,x7,0,1,5\n";
        assert!(read_operation(csv.as_bytes(), None).is_err());
    }

    #[test]
    fn client_row_without_demand_is_rejected() {
        let csv = "operation,id,latitude,longitude,demand\n3,A,0,0,\n3,8,0,1,\n";
        let err = read_operation(csv.as_bytes(), None).unwrap_err();
        let routing = err.downcast_ref::<RoutingError>().unwrap();
        assert_eq!(
            routing,
            &RoutingError::invalid_client(ClientId(8), "operation 3 row has no demand")
        );
        assert_eq!(
            routing.to_string(),
            "Invalid input for client 8: operation 3 row has no demand"
        );
    }
}
