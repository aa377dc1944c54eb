use chrono::{Duration, NaiveDate};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const HEADERS: [&str; 8] = [
    "DATA", "EMPRESA", "PLACAS", "CLIENTE", "DT.ENTREGA", "QUANT.", "V.NF", "",
];

fn main() -> Result<(), XlsxError> {
    let mut rng = SimpleRng::new(42);

    let companies = ["Areial Vale Verde", "Mineradora Rio Claro", "Transportes Duna"];
    let plates = ["ABC1D23", "QRS4T56", "JKL7M89", "XYZ0W12", "MNO3P45"];
    let clients = ["Construtora Norte", "Obra Centro", "Prefeitura", "Condomínio Sol"];
    let first_day = NaiveDate::from_ymd_opt(2024, 1, 2).ok_or_else(|| {
        XlsxError::ParameterError("invalid start date".to_string())
    })?;

    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let money_format = Format::new().set_num_format("#,##0.00");
    let sheet = workbook.add_worksheet();

    // The last header is blank on purpose: the dashboard drops that column.
    for (c, name) in HEADERS.iter().enumerate() {
        sheet.write_string(0, c as u16, *name)?;
    }

    let n_rows = 240u32;
    for r in 1..=n_rows {
        let day = first_day + Duration::days((rng.next_u64() % 180) as i64);
        let quantity = (6.0 + rng.next_f64() * 12.0).round();
        let price_per_m3 = 85.0 + rng.next_f64() * 30.0;
        let invoice = (quantity * price_per_m3 * 100.0).round() / 100.0;

        // A few rows carry no date, mirroring hand-filled sheets.
        if rng.next_f64() > 0.03 {
            sheet.write_datetime_with_format(r, 0, &day, &date_format)?;
        }
        sheet.write_string(r, 1, rng.pick(&companies))?;
        sheet.write_string(r, 2, rng.pick(&plates))?;
        sheet.write_string(r, 3, rng.pick(&clients))?;
        if rng.next_f64() < 0.7 {
            let delivered = day + Duration::days((rng.next_u64() % 4) as i64);
            sheet.write_datetime_with_format(r, 4, &delivered, &date_format)?;
        }
        sheet.write_number(r, 5, quantity)?;
        sheet.write_number_with_format(r, 6, invoice, &money_format)?;
        if rng.next_f64() < 0.1 {
            sheet.write_string(r, 7, "rascunho")?;
        }
    }

    let output_path = "dadss.xlsx";
    workbook.save(output_path)?;

    println!("Wrote {n_rows} deliveries to {output_path}");
    Ok(())
}
