//! A small placed design: `y = a + b` through an adder, with a registered
//! input stage.
//!
//! ```text
//!   a ──> n1 (lut) ──> q0 (ff) ──> s0 (adder) ──> y (lut) ──> out:y
//!   b ──> n9 (stale name, not in the packed netlist)
//! ```
//!
//! | block    | instance   | tile   |
//! |----------|------------|--------|
//! | `q0`     | `clb[0]`   | (2, 3) |
//! | `s0`     | `adder[1]` | (4, 3) |
//! | `a`      | `io[2]`    | (0, 3) |
//! | `b`      | `io[3]`    | (0, 4) |
//! | `y`      | `clb[4]`   | (5, 6) |
//! | `out:y`  | `io[5]`    | (7, 5) |

/// The synthesized netlist.
pub const NETLIST: &str = "\
# Generated by yosys
.model top
.inputs a b clk
.outputs y
.names a b n1
11 1
.latch n1 q0 re clk 0
.subckt adder a[0]=q0 b[0]=b cin[0]=unconn sumout[0]=s0 cout[0]=unconn
.cname u_add
.names s0 y
1 1
.end

.model adder
.inputs a b cin
.outputs cout sumout
.blackbox
.end
";

/// The packed netlist.
pub const HIERARCHY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<block name="top.net" instance="FPGA_packed_netlist[0]" architecture_id="SHA256:5f1c" atom_netlist_id="SHA256:9a7e">
  <inputs>a b clk</inputs>
  <outputs>out:y</outputs>
  <clocks>clk</clocks>
  <block name="q0" instance="clb[0]" mode="default">
    <inputs>
      <port name="I">a b open open</port>
    </inputs>
    <outputs>
      <port name="O">q0 open</port>
    </outputs>
    <clocks>
      <port name="clk">clk</port>
    </clocks>
    <block name="n1" instance="fle[0]" mode="n1_lut4">
      <inputs>
        <port name="in">a b open open</port>
      </inputs>
      <outputs>
        <port name="out">n1</port>
      </outputs>
      <block name="n1" instance="lut[0]">
        <inputs>
          <port name="in">a b open open</port>
        </inputs>
        <outputs>
          <port name="out">n1</port>
        </outputs>
      </block>
    </block>
    <block name="q0" instance="fle[1]" mode="n1_lut4">
      <inputs>
        <port name="in">n1 open open open</port>
      </inputs>
      <outputs>
        <port name="out">q0</port>
      </outputs>
      <clocks>
        <port name="clk">clk</port>
      </clocks>
      <block name="q0" instance="ff[0]">
        <inputs>
          <port name="D">n1</port>
        </inputs>
        <outputs>
          <port name="Q">q0</port>
        </outputs>
        <clocks>
          <port name="clk">clk</port>
        </clocks>
      </block>
    </block>
    <block name="open" instance="fle[2]"/>
  </block>
  <block name="s0" instance="adder[1]" mode="default">
    <inputs>
      <port name="a">q0</port>
      <port name="b">b</port>
      <port name="cin">open</port>
    </inputs>
    <outputs>
      <port name="sumout">s0</port>
      <port name="cout">open</port>
    </outputs>
  </block>
  <block name="a" instance="io[2]" mode="inpad">
    <outputs>
      <port name="inpad">a</port>
    </outputs>
  </block>
  <block name="b" instance="io[3]" mode="inpad">
    <outputs>
      <port name="inpad">b</port>
    </outputs>
  </block>
  <block name="y" instance="clb[4]" mode="default">
    <inputs>
      <port name="I">s0 open open open</port>
    </inputs>
    <outputs>
      <port name="O">y open</port>
    </outputs>
    <block name="y" instance="fle[0]" mode="n1_lut4">
      <inputs>
        <port name="in">s0 open open open</port>
      </inputs>
      <outputs>
        <port name="out">y</port>
      </outputs>
      <block name="y" instance="lut[0]">
        <inputs>
          <port name="in">s0 open open open</port>
        </inputs>
        <outputs>
          <port name="out">y</port>
        </outputs>
      </block>
    </block>
  </block>
  <block name="out:y" instance="io[5]" mode="outpad">
    <inputs>
      <port name="outpad">y</port>
    </inputs>
  </block>
</block>
"#;

/// The placement.
pub const PLACEMENT: &str = "\
Netlist_File: top.net Netlist_ID: SHA256:9a7e
Array size: 8 x 8 logic blocks

#block name\tx\ty\tsubblk\tlayer\tblock number
#----------\t--\t--\t------\t-----\t------------
q0\t\t2\t3\t0\t0\t#0
s0\t\t4\t3\t0\t0\t#1
a\t\t0\t3\t0\t0\t#2
b\t\t0\t4\t2\t0\t#3
y\t\t5\t6\t0\t0\t#4
out:y\t\t7\t5\t1\t0\t#5
";

/// The setup timing report: the critical path through the adder, the input
/// stage, and a path through a block the packed netlist does not know.
pub const TIMING_REPORT: &str = "\
#Timing report of worst 3 path(s)
# Unit scale: 1e-09 seconds
# Output precision: 3

#Path 1
Startpoint: q0.Q[0] (.latch at (2,3) clocked by clk)
Endpoint  : out:y.outpad[0] (.output at (7,5) clocked by virtual_io_clock)
Path Type : setup

Point                                                             Incr      Path
--------------------------------------------------------------------------------
clock clk (rise edge)                                            0.000     0.000
clock source latency                                             0.000     0.000
clk.inpad[0] (.input at (0,1))                                   0.000     0.000
| (intra 'io' routing)                                           0.118     0.118
| (inter-block routing)                                          0.000     0.118
| (intra 'clb' routing)                                          0.000     0.118
q0.clk[0] (.latch at (2,3))                                      0.000     0.118
| (primitive '.latch' Tcq)                                       0.124     0.242
q0.Q[0] (.latch at (2,3)) [clock-to-output]                      0.000     0.242
| (intra 'clb' routing)                                          0.000     0.242
| (inter-block routing)                                          0.337     0.579
s0.a[0] (adder at (4,3))                                         0.000     0.579
| (primitive 'adder' combinational delay)                        0.567     1.146
s0.sumout[0] (adder at (4,3))                                    0.000     1.146
| (inter-block routing)                                          0.412     1.558
| (intra 'clb' routing)                                          0.085     1.643
y.in[0] (.names at (5,6))                                        0.000     1.643
| (primitive '.names' combinational delay)                       0.235     1.878
y.out[0] (.names at (5,6))                                       0.000     1.878
| (intra 'clb' routing)                                          0.000     1.878
| (inter-block routing)                                          0.390     2.268
| (intra 'io' routing)                                           0.000     2.268
out:y.outpad[0] (.output at (7,5))                               0.000     2.268
data arrival time                                                          2.268

clock virtual_io_clock (rise edge)                               2.500     2.500
clock source latency                                             0.000     2.500
output external delay                                            0.000     2.500
data required time                                                         2.500
--------------------------------------------------------------------------------
data required time                                                         2.500
data arrival time                                                         -2.268
--------------------------------------------------------------------------------
slack (MET)                                                                0.232


#Path 2
Startpoint: b.inpad[0] (.input at (0,4) clocked by virtual_io_clock)
Endpoint  : q0.D[0] (.latch at (2,3) clocked by clk)
Path Type : setup

Point                                                             Incr      Path
--------------------------------------------------------------------------------
clock virtual_io_clock (rise edge)                               0.000     0.000
clock source latency                                             0.000     0.000
input external delay                                             0.000     0.000
b.inpad[0] (.input at (0,4))                                     0.000     0.000
| (intra 'io' routing)                                           0.118     0.118
| (inter-block routing)                                          0.397     0.515
| (intra 'clb' routing)                                          0.085     0.600
n9.in[1] (.names at (2,3))                                       0.000     0.600
| (primitive '.names' combinational delay)                       0.235     0.835
n9.out[0] (.names at (2,3))                                      0.000     0.835
| (intra 'clb' routing)                                          0.000     0.835
q0.D[0] (.latch at (2,3))                                        0.000     0.835
data arrival time                                                          0.835

clock clk (rise edge)                                            1.000     1.000
clock source latency                                             0.000     1.000
clk.inpad[0] (.input at (0,1))                                   0.000     1.000
| (intra 'io' routing)                                           0.118     1.118
| (inter-block routing)                                          0.000     1.118
| (intra 'clb' routing)                                          0.000     1.118
q0.clk[0] (.latch at (2,3))                                      0.000     1.118
cell setup time                                                 -0.066     1.052
data required time                                                         1.052
--------------------------------------------------------------------------------
data required time                                                         1.052
data arrival time                                                         -0.835
--------------------------------------------------------------------------------
slack (MET)                                                                0.217


#Path 3
Startpoint: a.inpad[0] (.input at (0,3) clocked by virtual_io_clock)
Endpoint  : q0.D[0] (.latch at (2,3) clocked by clk)
Path Type : setup

Point                                                             Incr      Path
--------------------------------------------------------------------------------
clock virtual_io_clock (rise edge)                               0.000     0.000
clock source latency                                             0.000     0.000
input external delay                                             0.000     0.000
a.inpad[0] (.input at (0,3))                                     0.000     0.000
| (intra 'io' routing)                                           0.118     0.118
| (inter-block routing)                                          0.210     0.328
| (intra 'clb' routing)                                          0.085     0.413
n1.in[0] (.names at (2,3))                                       0.000     0.413
| (primitive '.names' combinational delay)                       0.235     0.648
n1.out[0] (.names at (2,3))                                      0.000     0.648
| (intra 'clb' routing)                                          0.000     0.648
q0.D[0] (.latch at (2,3))                                        0.000     0.648
data arrival time                                                          0.648

clock clk (rise edge)                                            1.000     1.000
clock source latency                                             0.000     1.000
clk.inpad[0] (.input at (0,1))                                   0.000     1.000
| (intra 'io' routing)                                           0.118     1.118
| (inter-block routing)                                          0.000     1.118
| (intra 'clb' routing)                                          0.000     1.118
q0.clk[0] (.latch at (2,3))                                      0.000     1.118
cell setup time                                                 -0.066     1.052
data required time                                                         1.052
--------------------------------------------------------------------------------
data required time                                                         1.052
data arrival time                                                         -0.648
--------------------------------------------------------------------------------
slack (MET)                                                                0.404
";
